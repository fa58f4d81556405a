//! Configuration file parsing for the API server.
//!
//! Loads the bind address, database path, provider selection and the
//! per-component sections from a TOML file. Every field has a default, so an
//! empty file is a valid configuration.

use quill_graphics::GraphicsConfig;
use quill_research::ResearchConfig;
use quill_writer::WriterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// API configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A section failed validation
    #[error("Invalid configuration in [{section}]: {message}")]
    Invalid {
        /// Section name
        section: &'static str,
        /// What is wrong
        message: String,
    },
}

/// Which text model backs research, charts and drafting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama server
    Ollama,
}

/// Text model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Selected provider
    pub provider: ProviderKind,
    /// Anthropic model name
    pub anthropic_model: String,
    /// Ollama endpoint
    pub ollama_endpoint: String,
    /// Ollama model name
    pub ollama_model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            anthropic_model: quill_llm::anthropic::DEFAULT_MODEL.to_string(),
            ollama_endpoint: quill_llm::ollama::DEFAULT_ENDPOINT.to_string(),
            ollama_model: "llama3.1".to_string(),
        }
    }
}

/// Image and video backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// OpenAI image model for creative images
    pub creative_model: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            creative_model: quill_llm::openai_images::DEFAULT_MODEL.to_string(),
        }
    }
}

/// API server configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,

    /// Origins allowed by CORS; `*` allows any
    pub cors_origins: Vec<String>,

    /// Text model
    pub llm: LlmSettings,

    /// Image and video backends
    pub media: MediaSettings,

    /// Content and fact extraction
    pub research: ResearchConfig,

    /// Graphic routing and chart rendering
    pub graphics: GraphicsConfig,

    /// Post drafting
    pub writer: WriterConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 8000,
            database_path: "quill.db".to_string(),
            log_level: "info".to_string(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            llm: LlmSettings::default(),
            media: MediaSettings::default(),
            research: ResearchConfig::default(),
            graphics: GraphicsConfig::default(),
            writer: WriterConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ApiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate this configuration and every component section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |section: &'static str| move |message: String| ConfigError::Invalid { section, message };

        if self.bind_address.trim().is_empty() {
            return Err(invalid("server")("bind_address must not be empty".to_string()));
        }
        if self.database_path.trim().is_empty() {
            return Err(invalid("server")("database_path must not be empty".to_string()));
        }
        self.research.validate().map_err(invalid("research"))?;
        self.graphics.validate().map_err(invalid("graphics"))?;
        self.writer.validate().map_err(invalid("writer"))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
