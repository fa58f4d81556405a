//! Shared HTTP plumbing for the provider clients

use quill_domain::ProviderError;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Build a reqwest client with a whole-request timeout
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Other(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-success status and body to a provider error
pub(crate) fn status_error(status: StatusCode, body: &str, model: &str) -> ProviderError {
    let snippet: String = body.chars().take(300).collect();
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded,
        StatusCode::NOT_FOUND => ProviderError::ModelNotAvailable(model.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::MissingCredentials(format!("HTTP {}: {}", status, snippet))
        }
        _ if status.is_server_error() => ProviderError::Communication(format!("HTTP {}: {}", status, snippet)),
        _ => ProviderError::InvalidResponse(format!("HTTP {}: {}", status, snippet)),
    }
}

/// Map a transport error
pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(format!("Request timed out: {}", e))
    } else {
        ProviderError::Communication(format!("Request failed: {}", e))
    }
}

/// Exponential backoff delay before retry number `attempt` (1-based)
pub(crate) fn backoff(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Run `op` up to `max_attempts` times, backing off between transient failures
pub(crate) async fn with_retries<T, F, Fut>(
    label: &str,
    max_attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                warn!("{} attempt {}/{} failed: {}", label, attempt, max_attempts, e);
                tokio::time::sleep(backoff(base_delay, attempt)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
