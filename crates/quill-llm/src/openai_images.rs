//! OpenAI image generation client
//!
//! Backs conceptual graphics and every creative fallback.

use crate::http::{build_client, status_error, transport_error, with_retries};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use quill_domain::{ImageGenerator, MediaPayload, ProviderError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default image model
pub const DEFAULT_MODEL: &str = "dall-e-3";

/// Landscape size closest to 16:9
pub const DEFAULT_SIZE: &str = "1792x1024";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client for `POST /images/generations`
pub struct OpenAiImageClient {
    base_url: String,
    api_key: String,
    model: String,
    size: String,
    client: reqwest::Client,
    max_retries: u32,
    retry_delay: Duration,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl OpenAiImageClient {
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
            size: DEFAULT_SIZE.to_string(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: 2,
            retry_delay: Duration::from_secs(2),
        })
    }

    /// Create a client from `OPENAI_API_KEY`
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

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn generate_once(&self, prompt: &str) -> Result<MediaPayload, ProviderError> {
        let body = ImageRequest {
            model: &self.model,
            prompt,
            size: &self.size,
            quality: "standard",
            n: 1,
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, &self.model));
        }

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse image response: {}", e)))?;

        let datum = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse("no image in response".to_string()))?;

        if let Some(encoded) = datum.b64_json {
            let bytes = STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| ProviderError::InvalidResponse(format!("Invalid base64 image: {}", e)))?;
            return Ok(MediaPayload::png(bytes));
        }

        match datum.url {
            Some(url) => self.download(&url).await,
            None => Err(ProviderError::EmptyResponse("image has neither data nor url".to_string())),
        }
    }

    async fn download(&self, url: &str) -> Result<MediaPayload, ProviderError> {
        debug!("Downloading generated image");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "", &self.model));
        }
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(MediaPayload::png(bytes.to_vec()))
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<MediaPayload, ProviderError> {
        info!("Requesting {} image ({} char prompt)", self.model, prompt.len());
        with_retries("OpenAI images", self.max_retries, self.retry_delay, || {
            self.generate_once(prompt)
        })
        .await
    }

    fn backend_name(&self) -> &str {
        "openai-images"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key() {
        assert!(matches!(
            OpenAiImageClient::new(""),
            Err(ProviderError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let body = ImageRequest {
            model: DEFAULT_MODEL,
            prompt: "a warehouse",
            size: DEFAULT_SIZE,
            quality: "standard",
            n: 1,
            response_format: "b64_json",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["size"], "1792x1024");
        assert_eq!(json["model"], "dall-e-3");
        assert_eq!(json["n"], 1);
    }
}
