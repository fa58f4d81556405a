//! Trait definitions for external interactions
//!
//! These traits define the boundaries between pipeline logic and the
//! generative services / storage it talks to. Implementations live in
//! `quill-llm` and `quill-store`; components receive them as explicit
//! handles constructed once at startup.

use crate::{MediaPayload, NewSubmission, ProviderError, Submission, SubmissionId, SubmissionPatch};
use async_trait::async_trait;

/// Per-call settings for a language-model completion
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature; `None` uses the provider default
    pub temperature: Option<f32>,
}

impl GenerationOptions {
    /// Options with a token budget and provider-default temperature
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature: None,
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::with_max_tokens(2000)
    }
}

/// Trait for language-model providers
///
/// Implemented by the infrastructure layer (quill-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a text completion for a single user prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, ProviderError>;

    /// Name of the model answering requests
    fn model_name(&self) -> &str;
}

/// Trait for text-to-image backends
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Render one image from a prompt
    async fn generate_image(&self, prompt: &str) -> Result<MediaPayload, ProviderError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &str;
}

/// Trait for text-to-video backends
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Render one clip; may block for minutes while the backend works
    async fn generate_video(&self, prompt: &str, duration_secs: u32) -> Result<MediaPayload, ProviderError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &str;
}

/// Trait for storing and retrieving submissions
///
/// Implemented by the infrastructure layer (quill-store)
pub trait SubmissionStore {
    /// Error type for store operations
    type Error;

    /// Create a new pending submission
    fn create_submission(&mut self, submission: NewSubmission) -> Result<Submission, Self::Error>;

    /// Get a submission by ID
    fn get_submission(&self, id: SubmissionId) -> Result<Option<Submission>, Self::Error>;

    /// All submissions awaiting review, newest first
    fn list_pending(&self) -> Result<Vec<Submission>, Self::Error>;

    /// Apply a partial update; returns the updated record, or `None` if absent
    fn update_submission(
        &mut self,
        id: SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Option<Submission>, Self::Error>;

    /// Delete a submission; returns whether a record was removed
    fn delete_submission(&mut self, id: SubmissionId) -> Result<bool, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_builder() {
        let options = GenerationOptions::with_max_tokens(1200).temperature(0.7);
        assert_eq!(options.max_tokens, 1200);
        assert_eq!(options.temperature, Some(0.7));
    }

    #[test]
    fn test_default_options() {
        let options = GenerationOptions::default();
        assert_eq!(options.max_tokens, 2000);
        assert!(options.temperature.is_none());
    }
}
