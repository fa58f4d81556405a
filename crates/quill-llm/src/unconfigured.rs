//! Placeholder backend for services whose credentials are absent
//!
//! Lets the pipeline start without every key present: calls fail with
//! `MissingCredentials`, which the graphics router treats as a fallback
//! trigger.

use async_trait::async_trait;
use quill_domain::{ImageGenerator, MediaPayload, ProviderError, VideoGenerator};

/// Backend that always reports missing credentials
#[derive(Debug, Clone)]
pub struct Unconfigured {
    name: String,
    env_var: String,
}

impl Unconfigured {
    /// Create a placeholder for `name`, whose key lives in `env_var`
    pub fn new(name: impl Into<String>, env_var: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            env_var: env_var.into(),
        }
    }

    fn error(&self) -> ProviderError {
        ProviderError::MissingCredentials(self.env_var.clone())
    }
}

#[async_trait]
impl ImageGenerator for Unconfigured {
    async fn generate_image(&self, _prompt: &str) -> Result<MediaPayload, ProviderError> {
        Err(self.error())
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl VideoGenerator for Unconfigured {
    async fn generate_video(&self, _prompt: &str, _duration_secs: u32) -> Result<MediaPayload, ProviderError> {
        Err(self.error())
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_missing_key() {
        let backend = Unconfigured::new("imagen", "GOOGLE_API_KEY");
        assert_eq!(
            backend.generate_image("x").await,
            Err(ProviderError::MissingCredentials("GOOGLE_API_KEY".into()))
        );
        assert!(backend.generate_video("x", 8).await.is_err());
        assert_eq!(ImageGenerator::backend_name(&backend), "imagen");
    }
}
