//! Google Imagen client
//!
//! Text-capable image model used for infographics.

use crate::http::{build_client, status_error, transport_error, with_retries};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use quill_domain::{ImageGenerator, MediaPayload, ProviderError};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Default Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Imagen model
pub const DEFAULT_MODEL: &str = "imagen-3.0-generate-002";

/// Environment variable holding the API key (shared with Veo)
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client for `models/{model}:predict`
pub struct ImagenClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
    retry_delay: Duration,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl ImagenClient {
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
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: 2,
            retry_delay: Duration::from_secs(2),
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

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn generate_once(&self, prompt: &str) -> Result<MediaPayload, ProviderError> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "16:9",
            }
        });

        let response = self
            .client
            .post(format!("{}/models/{}:predict", self.base_url, self.model))
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

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse Imagen response: {}", e)))?;
        decode_prediction(parsed)
    }
}

fn decode_prediction(response: PredictResponse) -> Result<MediaPayload, ProviderError> {
    let prediction = response
        .predictions
        .into_iter()
        .find(|p| p.bytes_base64_encoded.is_some())
        .ok_or_else(|| ProviderError::EmptyResponse("no image in Imagen response".to_string()))?;

    let encoded = prediction.bytes_base64_encoded.unwrap_or_default();
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| ProviderError::InvalidResponse(format!("Invalid base64 image: {}", e)))?;
    let mime = prediction.mime_type.unwrap_or_else(|| quill_domain::media::MIME_PNG.to_string());
    Ok(MediaPayload::new(mime, bytes))
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    async fn generate_image(&self, prompt: &str) -> Result<MediaPayload, ProviderError> {
        info!("Requesting {} image ({} char prompt)", self.model, prompt.len());
        with_retries("Imagen", self.max_retries, self.retry_delay, || self.generate_once(prompt)).await
    }

    fn backend_name(&self) -> &str {
        "imagen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_prediction() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"predictions": [{"bytesBase64Encoded": "YWJj", "mimeType": "image/png"}]}"#,
        )
        .unwrap();
        let payload = decode_prediction(response).unwrap();
        assert_eq!(payload.bytes, b"abc");
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn test_filtered_prediction_is_empty() {
        let response: PredictResponse = serde_json::from_str(r#"{"predictions": [{}]}"#).unwrap();
        assert!(matches!(decode_prediction(response), Err(ProviderError::EmptyResponse(_))));

        let response: PredictResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(decode_prediction(response).is_err());
    }
}
