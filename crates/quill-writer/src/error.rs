//! Writing Composer error types

use quill_domain::ProviderError;
use thiserror::Error;

/// Errors that can occur while drafting a post
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriterError {
    /// Language-model call failed
    #[error("LLM error: {0}")]
    Llm(#[from] ProviderError),

    /// Model returned only whitespace
    #[error("Model returned an empty draft")]
    EmptyDraft,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
