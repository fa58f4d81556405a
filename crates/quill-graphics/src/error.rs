//! Error types for graphic generation

use quill_domain::ProviderError;
use thiserror::Error;

/// Errors raised inside a generation backend
///
/// These never reach the router's caller directly: the router turns them
/// into a fallback or a [`crate::FailureReason`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphicsError {
    /// Provider call failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Model output was not a usable chart specification
    #[error("Invalid chart spec: {0}")]
    InvalidChartSpec(String),

    /// Chart specification could not be rendered
    #[error("Render error: {0}")]
    Render(String),

    /// Backend returned an empty payload
    #[error("Empty payload from {0}")]
    EmptyPayload(String),
}
