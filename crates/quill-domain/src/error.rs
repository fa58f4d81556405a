//! Errors reported by generative backends

use thiserror::Error;

/// Errors that can occur while calling a language-model, image or video backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// No API key configured for this backend
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend answered successfully but produced nothing usable
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Long-running operation did not finish in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Whether retrying the same call could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Communication(_) | ProviderError::RateLimitExceeded | ProviderError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Communication("reset".into()).is_transient());
        assert!(ProviderError::RateLimitExceeded.is_transient());
        assert!(!ProviderError::MissingCredentials("GOOGLE_API_KEY".into()).is_transient());
        assert!(!ProviderError::EmptyResponse("no image".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = ProviderError::MissingCredentials("OPENAI_API_KEY".into());
        assert_eq!(err.to_string(), "Missing credentials: OPENAI_API_KEY");
    }
}
