//! Page fetching with a bounded retry policy
//!
//! Each URL gets up to `max_retries` attempts separated by a fixed delay.
//! Timeouts, connection/TLS failures and 5xx responses are retried; a 4xx
//! response ends the attempt sequence immediately.

use crate::config::ResearchConfig;
use crate::error::ResearchError;
use crate::source::is_fetchable;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// HTTP client that fetches page HTML with retries
pub struct PageFetcher {
    client: reqwest::Client,
    max_attempts: u32,
    retry_delay: Duration,
    timeout: Duration,
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers
}

impl PageFetcher {
    /// Create a fetcher from research configuration
    pub fn new(config: &ResearchConfig) -> Result<Self, ResearchError> {
        Self::with_timing(config.max_retries, config.retry_delay(), config.request_timeout())
    }

    /// Create a fetcher with explicit attempt count, delay and per-attempt timeout
    pub fn with_timing(max_attempts: u32, retry_delay: Duration, timeout: Duration) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ResearchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
            retry_delay,
            timeout,
        })
    }

    /// Fetch a page body, retrying transient failures
    pub async fn fetch(&self, url: &str) -> Result<String, ResearchError> {
        if !is_fetchable(url) {
            error!("Invalid URL format: {}", url);
            return Err(ResearchError::InvalidUrl(url.to_string()));
        }

        let mut attempts = 0;
        loop {
            attempts += 1;
            info!("Fetching URL (attempt {}/{}): {}", attempts, self.max_attempts, url);

            let err = match self.fetch_once(url).await {
                Ok(body) => {
                    info!("Fetched {} ({} chars)", url, body.len());
                    return Ok(body);
                }
                Err(e) => e,
            };

            warn!("Attempt {} failed for {}: {}", attempts, url, err);
            if !err.is_retryable() {
                debug!("Not retrying {}: client error", url);
                return Err(ResearchError::Exhausted {
                    attempts,
                    last: Box::new(err),
                });
            }
            if attempts >= self.max_attempts {
                error!("All {} attempts failed for {}. Last error: {}", attempts, url, err);
                return Err(ResearchError::Exhausted {
                    attempts,
                    last: Box::new(err),
                });
            }

            debug!("Waiting {:?} before retry", self.retry_delay);
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ResearchError> {
        let response = self.client.get(url).send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                ResearchError::Timeout(self.timeout.as_secs())
            } else {
                ResearchError::Body(e.to_string())
            }
        })
    }

    fn classify(&self, e: reqwest::Error) -> ResearchError {
        if e.is_timeout() {
            ResearchError::Timeout(self.timeout.as_secs())
        } else {
            ResearchError::Connection(e.to_string())
        }
    }
}
