//! Error types for research

use quill_domain::ProviderError;
use thiserror::Error;

/// Errors that can occur while fetching a page or extracting facts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResearchError {
    /// URL lacks a scheme or host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A single attempt exceeded the request timeout
    #[error("Timeout after {0}s")]
    Timeout(u64),

    /// Connection, TLS or transport failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("HTTP error {status}")]
    Status {
        /// Status code returned by the server
        status: u16,
    },

    /// Response body could not be read
    #[error("Failed to read body: {0}")]
    Body(String),

    /// Every attempt failed; carries the last error
    #[error("All {attempts} attempts failed. Last error: {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Last error seen
        last: Box<ResearchError>,
    },

    /// Language-model call failed
    #[error("LLM error: {0}")]
    Llm(#[from] ProviderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResearchError {
    /// Whether another fetch attempt may succeed
    ///
    /// Client errors (4xx) are permanent; everything else on the wire is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResearchError::Timeout(_) | ResearchError::Connection(_) | ResearchError::Body(_) => true,
            ResearchError::Status { status } => !(400..500).contains(status),
            _ => false,
        }
    }
}
