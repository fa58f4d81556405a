//! Configuration for research (page fetching and fact extraction)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Content Extractor and Fact Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Total fetch attempts per URL
    pub max_retries: u32,

    /// Fixed delay between fetch attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Per-attempt request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Maximum characters of extracted document handed to the model
    pub max_content_chars: usize,

    /// Below this many characters the paragraph fallback is tried
    pub min_content_chars: usize,

    /// Paragraphs at or below this length are ignored by the fallback
    pub min_paragraph_chars: usize,

    /// Maximum image captions kept
    pub max_image_captions: usize,

    /// Alt text at or below this length is not a caption
    pub min_caption_chars: usize,

    /// Token budget for the fact-extraction completion
    pub fact_max_tokens: u32,
}

impl ResearchConfig {
    /// Fixed delay between fetch attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Per-attempt request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_content_chars == 0 {
            return Err("max_content_chars must be greater than 0".to_string());
        }
        if self.min_content_chars > self.max_content_chars {
            return Err("min_content_chars cannot exceed max_content_chars".to_string());
        }
        if self.fact_max_tokens == 0 {
            return Err("fact_max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Patient preset: more attempts, longer timeouts, more context
    pub fn patient() -> Self {
        Self {
            max_retries: 5,
            retry_delay_ms: 5_000,
            request_timeout_secs: 45,
            max_content_chars: 16_000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 2_000,
            request_timeout_secs: 20,
            max_content_chars: 8_000,
            min_content_chars: 200,
            min_paragraph_chars: 50,
            max_image_captions: 10,
            min_caption_chars: 20,
            fact_max_tokens: 2_000,
        }
    }
}
