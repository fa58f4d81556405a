//! Quill Generative Provider Layer
//!
//! Implementations of the `LlmProvider`, `ImageGenerator` and
//! `VideoGenerator` traits from `quill-domain`.
//!
//! # Providers
//!
//! - `AnthropicProvider`: Anthropic Messages API (default text backend)
//! - `OllamaProvider`: local Ollama API
//! - `OpenAiImageClient`: OpenAI image generation (creative images)
//! - `ImagenClient`: Google Imagen (text-capable images for infographics)
//! - `VeoClient`: Google Veo (long-running video generation)
//! - `Unconfigured`: stand-in for a backend whose API key is absent
//! - `MockProvider`, `MockImageGenerator`, `MockVideoGenerator`: deterministic
//!   doubles for tests
//!
//! # Examples
//!
//! ```
//! use quill_llm::MockProvider;
//! use quill_domain::{GenerationOptions, LlmProvider};
//!
//! # tokio_test_block(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt", &GenerationOptions::default()).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod anthropic;
mod http;
pub mod imagen;
pub mod mock_media;
pub mod ollama;
pub mod openai_images;
pub mod unconfigured;
pub mod veo;

use async_trait::async_trait;
use quill_domain::{GenerationOptions, LlmProvider, ProviderError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

pub use anthropic::AnthropicProvider;
pub use imagen::ImagenClient;
pub use mock_media::{MockImageGenerator, MockVideoGenerator};
pub use ollama::OllamaProvider;
pub use openai_images::OpenAiImageClient;
pub use unconfigured::Unconfigured;
pub use veo::VeoClient;

/// A prompt/temperature pair seen by `MockProvider`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Prompt text
    pub prompt: String,
    /// Options passed with the prompt
    pub options: GenerationOptions,
}

/// Mock LLM provider for deterministic testing
///
/// Responses are chosen in this order: the next queued response, then the
/// first registered rule whose key is contained in the prompt, then the
/// default response. No network calls are made.
///
/// # Examples
///
/// ```
/// use quill_llm::MockProvider;
/// use quill_domain::{GenerationOptions, LlmProvider};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let mut provider = MockProvider::default();
/// provider.add_response("chart", "{\"kind\": \"bar\"}");
/// let out = provider.generate("draw a chart", &GenerationOptions::default()).await.unwrap();
/// assert_eq!(out, "{\"kind\": \"bar\"}");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, Result<String, ProviderError>)>>>,
    queue: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with `response` whenever the prompt contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), Ok(response.into())));
    }

    /// Fail whenever the prompt contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), Err(ProviderError::Other("Mock error".to_string()))));
    }

    /// Queue a one-shot response, consumed before any rule
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response.into()));
    }

    /// Queue a one-shot failure
    pub fn push_error(&self, error: ProviderError) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Reset the recorded calls
    pub fn reset_call_count(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Every call seen so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|c| c.prompt.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                prompt: prompt.to_string(),
                options: options.clone(),
            });

        if let Some(queued) = self.queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front() {
            return queued;
        }

        let rules = self.rules.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, response)) = rules.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
            return response.clone();
        }

        Ok(self.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
