//! Research pipeline: URLs in, one research result per URL out

use crate::content::ContentExtractor;
use crate::facts::FactExtractor;
use crate::source::source_name;
use quill_domain::ResearchResult;
use tracing::{info, warn};

/// Fetches pages and extracts facts from them, one URL at a time
pub struct Researcher {
    content: ContentExtractor,
    facts: FactExtractor,
}

impl Researcher {
    /// Create a researcher from its two stages
    pub fn new(content: ContentExtractor, facts: FactExtractor) -> Self {
        Self { content, facts }
    }

    /// Fetch one URL and extract facts relevant to `topic`
    ///
    /// A fetch failure produces the explicit failed-fetch record rather than
    /// an error.
    pub async fn fetch_and_extract(&self, url: &str, topic: &str) -> ResearchResult {
        info!("Fetching and extracting from URL: {}", url);
        let preview: String = topic.chars().take(100).collect();
        info!("Topic: {}...", preview);

        match self.content.fetch_content(url).await {
            Ok(content) => self.facts.extract_facts(&content, topic, url).await,
            Err(e) => {
                warn!("Content extraction failed for {}: {}", url, e);
                ResearchResult::fetch_failed(url, source_name(url))
            }
        }
    }

    /// Process URLs sequentially, preserving order
    ///
    /// Blank entries are skipped; every other entry yields exactly one result.
    pub async fn process_research_urls<S: AsRef<str>>(&self, urls: &[S], topic: &str) -> Vec<ResearchResult> {
        let mut results = Vec::new();
        for url in urls {
            let url = url.as_ref().trim();
            if url.is_empty() {
                continue;
            }
            results.push(self.fetch_and_extract(url, topic).await);
        }
        info!("Processed {} research URLs", results.len());
        results
    }
}
