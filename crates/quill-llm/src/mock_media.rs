//! Deterministic image and video doubles for tests

use async_trait::async_trait;
use quill_domain::{ImageGenerator, MediaPayload, ProviderError, VideoGenerator};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Recorder {
    prompts: Vec<String>,
}

/// Image generator returning a fixed payload or a fixed error
#[derive(Debug, Clone)]
pub struct MockImageGenerator {
    name: String,
    outcome: Result<MediaPayload, ProviderError>,
    recorder: Arc<Mutex<Recorder>>,
}

impl MockImageGenerator {
    /// Always succeed with a small PNG-tagged payload
    pub fn succeeding(name: impl Into<String>) -> Self {
        let name = name.into();
        let bytes = format!("{}-image", name).into_bytes();
        Self {
            name,
            outcome: Ok(MediaPayload::png(bytes)),
            recorder: Arc::default(),
        }
    }

    /// Always fail with `error`
    pub fn failing(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            outcome: Err(error),
            recorder: Arc::default(),
        }
    }

    /// Number of images requested
    pub fn call_count(&self) -> usize {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner).prompts.len()
    }

    /// Prompts received, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .prompts
            .clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<MediaPayload, ProviderError> {
        self.recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .prompts
            .push(prompt.to_string());
        self.outcome.clone()
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}

/// Video generator returning a fixed payload or a fixed error
#[derive(Debug, Clone)]
pub struct MockVideoGenerator {
    outcome: Result<MediaPayload, ProviderError>,
    recorder: Arc<Mutex<Recorder>>,
}

impl MockVideoGenerator {
    /// Always succeed with a small MP4-tagged payload
    pub fn succeeding() -> Self {
        Self {
            outcome: Ok(MediaPayload::mp4(b"mock-video".to_vec())),
            recorder: Arc::default(),
        }
    }

    /// Always fail with `error`
    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            recorder: Arc::default(),
        }
    }

    /// Number of videos requested
    pub fn call_count(&self) -> usize {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner).prompts.len()
    }

    /// Prompts received, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .prompts
            .clone()
    }
}

#[async_trait]
impl VideoGenerator for MockVideoGenerator {
    async fn generate_video(&self, prompt: &str, _duration_secs: u32) -> Result<MediaPayload, ProviderError> {
        self.recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .prompts
            .push(prompt.to_string());
        self.outcome.clone()
    }

    fn backend_name(&self) -> &str {
        "mock-video"
    }
}
