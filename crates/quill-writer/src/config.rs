//! Configuration for the Writing Composer

use crate::banned::BANNED_PHRASES;
use serde::{Deserialize, Serialize};

/// Configuration for drafting posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Token budget for a draft
    pub max_tokens: u32,

    /// Sampling temperature for the first draft
    pub temperature: f32,

    /// Higher temperature for the single regeneration
    pub regeneration_temperature: f32,

    /// Who the author is, completing "a ..." in the prompt
    pub persona: String,

    /// Lower bound of the requested post length (characters)
    pub min_chars: usize,

    /// Upper bound of the requested post length (characters)
    pub max_chars: usize,

    /// Phrases that trigger a regeneration, matched case-insensitively
    pub banned_phrases: Vec<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1200,
            temperature: 0.7,
            regeneration_temperature: 0.8,
            persona: "25-year supply chain consultant at Claris AI (an AI consulting firm specializing in retail supply chain)"
                .to_string(),
            min_chars: 600,
            max_chars: 1100,
            banned_phrases: BANNED_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl WriterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        for (name, value) in [
            ("temperature", self.temperature),
            ("regeneration_temperature", self.regeneration_temperature),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0.0 and 1.0", name));
            }
        }
        if self.min_chars == 0 || self.min_chars > self.max_chars {
            return Err("min_chars must be positive and not exceed max_chars".to_string());
        }
        if self.persona.trim().is_empty() {
            return Err("persona must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize TOML: {}", e))
    }
}
