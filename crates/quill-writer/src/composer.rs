//! Writing Composer: idea plus research to a finished post

use crate::banned::find_banned;
use crate::config::WriterConfig;
use crate::error::WriterError;
use crate::prompt::{regeneration_prompt, DraftPromptBuilder};
use quill_domain::{DataSource, GenerationOptions, LlmProvider, ResearchResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A drafted post
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPost {
    /// Post text, trimmed
    pub text: String,
    /// Banned phrase that forced the regeneration, if one happened
    pub regenerated_for: Option<String>,
}

/// Drafts LinkedIn posts with a language model
pub struct WritingComposer {
    llm: Arc<dyn LlmProvider>,
    config: WriterConfig,
}

impl WritingComposer {
    /// Create a composer, rejecting an invalid configuration
    pub fn new(llm: Arc<dyn LlmProvider>, config: WriterConfig) -> Result<Self, WriterError> {
        config.validate().map_err(WriterError::Config)?;
        Ok(Self { llm, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Draft a post for `author` from a raw idea
    ///
    /// If the draft contains a banned phrase it is regenerated exactly once
    /// at the higher regeneration temperature, and that second draft is
    /// returned whatever it contains.
    pub async fn draft_post(
        &self,
        idea: &str,
        author: &str,
        research: &[ResearchResult],
        data_sources: &[DataSource],
    ) -> Result<ComposedPost, WriterError> {
        let prompt = DraftPromptBuilder::new(idea, author)
            .with_research(research)
            .with_data_sources(data_sources)
            .build(&self.config);
        debug!("Draft prompt length: {} chars", prompt.len());

        let options = GenerationOptions::with_max_tokens(self.config.max_tokens).temperature(self.config.temperature);
        let draft = self.complete(&prompt, &options).await?;

        let Some(phrase) = find_banned(&draft, &self.config.banned_phrases) else {
            info!("Drafted post for {} ({} chars)", author, draft.chars().count());
            return Ok(ComposedPost {
                text: draft,
                regenerated_for: None,
            });
        };

        warn!("Draft contained banned phrase '{}', regenerating once", phrase);
        let options = GenerationOptions::with_max_tokens(self.config.max_tokens)
            .temperature(self.config.regeneration_temperature);
        let text = self
            .complete(&regeneration_prompt(idea, author, phrase), &options)
            .await?;
        info!("Regenerated post for {} ({} chars)", author, text.chars().count());

        Ok(ComposedPost {
            text,
            regenerated_for: Some(phrase.to_string()),
        })
    }

    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String, WriterError> {
        let text = self.llm.generate(prompt, options).await?.trim().to_string();
        if text.is_empty() {
            return Err(WriterError::EmptyDraft);
        }
        Ok(text)
    }
}
