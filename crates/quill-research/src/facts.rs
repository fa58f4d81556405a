//! Fact Extractor: page text to structured research facts

use crate::config::ResearchConfig;
use crate::parser::parse_fact_response;
use crate::prompt::FactPromptBuilder;
use crate::source::source_name;
use quill_domain::{GenerationOptions, LlmProvider, ResearchResult};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Delegates fact extraction to a language model
pub struct FactExtractor {
    llm: Arc<dyn LlmProvider>,
    max_tokens: u32,
}

impl FactExtractor {
    /// Create a fact extractor
    pub fn new(llm: Arc<dyn LlmProvider>, config: &ResearchConfig) -> Self {
        Self {
            llm,
            max_tokens: config.fact_max_tokens,
        }
    }

    /// Extract facts relevant to `topic` from page text
    ///
    /// Never fails: an LLM error yields an empty result with relevance 0 and
    /// the error in the summary; malformed output degrades as described in
    /// [`parse_fact_response`]. `url` and `source_name` are always stamped.
    pub async fn extract_facts(&self, content: &str, topic: &str, url: &str) -> ResearchResult {
        let source = source_name(url);
        let prompt = FactPromptBuilder::new(content, topic, &source).build();
        debug!("Fact prompt length: {} chars", prompt.len());

        let options = GenerationOptions::with_max_tokens(self.max_tokens);
        let response = match self.llm.generate(&prompt, &options).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error extracting facts from {}: {}", url, e);
                return ResearchResult {
                    url: url.to_string(),
                    source_name: source,
                    extracted_facts: Vec::new(),
                    summary: format!("Error extracting content: {}", e),
                    relevance_score: 0,
                    error: None,
                };
            }
        };

        let parsed = parse_fact_response(&response);
        info!(
            "Extracted {} facts from {} with relevance score {}",
            parsed.facts.len(),
            source,
            parsed.relevance_score
        );

        ResearchResult {
            url: url.to_string(),
            source_name: source,
            extracted_facts: parsed.facts,
            summary: parsed.summary,
            relevance_score: parsed.relevance_score,
            error: None,
        }
    }
}
