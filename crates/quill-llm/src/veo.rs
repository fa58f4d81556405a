//! Google Veo video client
//!
//! Video generation is a long-running operation: the initial request
//! returns an operation name which is polled at a fixed interval until it
//! reports `done`, then the finished clip is downloaded.

use crate::http::{build_client, status_error, transport_error};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use quill_domain::{MediaPayload, ProviderError, VideoGenerator};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Veo model
pub const DEFAULT_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Default delay between operation polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default number of polls before giving up
pub const DEFAULT_MAX_POLLS: u32 = 30;

/// Client for `models/{model}:predictLongRunning`
pub struct VeoClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Deserialize)]
struct OperationHandle {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<OperationResponse>,
}

#[derive(Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Deserialize)]
struct GeneratedSample {
    video: Option<VideoRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRef {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
}

/// Where the finished clip lives
enum VideoLocation {
    Inline(Vec<u8>),
    Remote(String),
}

/// Poll `check` until it yields a value, sleeping `interval` between checks
///
/// Returns `ProviderError::Timeout` after `max_polls` unsuccessful checks.
/// Errors from `check` abort polling immediately.
pub async fn poll_until_done<T, F, Fut>(interval: Duration, max_polls: u32, mut check: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ProviderError>>,
{
    for poll in 1..=max_polls {
        tokio::time::sleep(interval).await;
        debug!("Polling operation ({}/{})", poll, max_polls);
        if let Some(value) = check().await? {
            return Ok(value);
        }
    }
    Err(ProviderError::Timeout(format!(
        "operation not finished after {} polls",
        max_polls
    )))
}

impl VeoClient {
    /// Create a client; an empty key is rejected
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredentials(API_KEY_ENV.to_string()));
        }
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            client: build_client(Duration::from_secs(120))?,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Create a client from `GOOGLE_API_KEY`
    pub fn from_env() -> Result<Self, ProviderError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| ProviderError::MissingCredentials(API_KEY_ENV.to_string()))?;
        Self::new(key)
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override polling cadence
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn start(&self, prompt: &str, duration_secs: u32) -> Result<String, ProviderError> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "aspectRatio": "16:9",
                "durationSeconds": duration_secs,
                "sampleCount": 1,
            }
        });

        let response = self
            .client
            .post(format!("{}/models/{}:predictLongRunning", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, &self.model));
        }

        let handle: OperationHandle = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse operation: {}", e)))?;
        Ok(handle.name)
    }

    async fn check(&self, operation: &str) -> Result<Option<VideoLocation>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, operation))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, &self.model));
        }

        let op: Operation = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse operation: {}", e)))?;
        locate_video(op)
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(uri)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, &self.model));
        }
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }
}

fn locate_video(op: Operation) -> Result<Option<VideoLocation>, ProviderError> {
    if !op.done {
        return Ok(None);
    }
    if let Some(error) = op.error {
        return Err(ProviderError::Other(format!("Video generation failed: {}", error.message)));
    }

    let video = op
        .response
        .and_then(|r| r.generate_video_response)
        .and_then(|r| r.generated_samples.into_iter().find_map(|s| s.video))
        .ok_or_else(|| ProviderError::EmptyResponse("no video in finished operation".to_string()))?;

    if let Some(encoded) = video.bytes_base64_encoded {
        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ProviderError::InvalidResponse(format!("Invalid base64 video: {}", e)))?;
        return Ok(Some(VideoLocation::Inline(bytes)));
    }
    match video.uri {
        Some(uri) => Ok(Some(VideoLocation::Remote(uri))),
        None => Err(ProviderError::EmptyResponse("video has neither bytes nor uri".to_string())),
    }
}

#[async_trait]
impl VideoGenerator for VeoClient {
    async fn generate_video(&self, prompt: &str, duration_secs: u32) -> Result<MediaPayload, ProviderError> {
        info!("Starting {} video ({}s, {} char prompt)", self.model, duration_secs, prompt.len());
        let operation = self.start(prompt, duration_secs).await?;
        info!("Video operation '{}' started", operation);

        let location = poll_until_done(self.poll_interval, self.max_polls, || self.check(&operation))
            .await
            .inspect_err(|e| warn!("Video operation '{}' did not complete: {}", operation, e))?;

        let bytes = match location {
            VideoLocation::Inline(bytes) => bytes,
            VideoLocation::Remote(uri) => self.download(&uri).await?,
        };
        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse("downloaded video is empty".to_string()));
        }
        Ok(MediaPayload::mp4(bytes))
    }

    fn backend_name(&self) -> &str {
        "veo"
    }
}
