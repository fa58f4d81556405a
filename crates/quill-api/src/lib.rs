//! Quill API
//!
//! HTTP layer over the submission pipeline: ideas come in, are researched,
//! drafted and illustrated, and wait in a review queue for approval.
//!
//! # Endpoints
//!
//! - `GET /` health check
//! - `POST /api/submit-idea`
//! - `GET /api/pending-submissions`
//! - `POST /api/approve-submission/:id`, `POST /api/reject-submission/:id`
//! - `POST /api/regenerate-image/:id`, `POST /api/generate-variations/:id`,
//!   `POST /api/select-variation/:id`

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline;

use config::{ApiConfig, ProviderKind};
use handlers::{create_router, AppState};
use pipeline::Pipeline;
use quill_domain::{ImageGenerator, LlmProvider, ProviderError, VideoGenerator};
use quill_graphics::GraphicRouter;
use quill_llm::{
    imagen, openai_images, veo, AnthropicProvider, ImagenClient, OllamaProvider, OpenAiImageClient, Unconfigured,
    VeoClient,
};
use quill_research::{ContentExtractor, FactExtractor, ResearchError, Researcher};
use quill_store::{SqliteStore, StoreError};
use quill_writer::{WriterError, WritingComposer};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Text model could not be created
    #[error("Language model unavailable: {0}")]
    Provider(#[from] ProviderError),

    /// Research stage could not be created
    #[error("Research setup failed: {0}")]
    Research(#[from] ResearchError),

    /// Drafting stage could not be created
    #[error("Writer setup failed: {0}")]
    Writer(#[from] WriterError),

    /// Database could not be opened
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Generation backends used by the pipeline
#[derive(Clone)]
pub struct Backends {
    /// Text model for facts, chart specs and drafts
    pub llm: Arc<dyn LlmProvider>,
    /// Creative image backend
    pub creative: Arc<dyn ImageGenerator>,
    /// Text-capable image backend for infographics
    pub infographic: Arc<dyn ImageGenerator>,
    /// Video backend
    pub video: Arc<dyn VideoGenerator>,
}

impl Backends {
    /// Build backends from configuration and environment credentials
    ///
    /// The text model is required. Image and video backends whose key is
    /// absent are replaced by [`Unconfigured`], which the router falls back
    /// from.
    pub fn from_env(config: &ApiConfig) -> Result<Self, StartupError> {
        let llm: Arc<dyn LlmProvider> = match config.llm.provider {
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_env(config.llm.anthropic_model.clone())?),
            ProviderKind::Ollama => Arc::new(OllamaProvider::new(
                config.llm.ollama_endpoint.clone(),
                config.llm.ollama_model.clone(),
            )?),
        };
        info!("Text model: {}", llm.model_name());

        let creative: Arc<dyn ImageGenerator> = match OpenAiImageClient::from_env() {
            Ok(client) => Arc::new(client.with_model(config.media.creative_model.clone())),
            Err(e) => unconfigured("creative", openai_images::API_KEY_ENV, e),
        };
        let infographic: Arc<dyn ImageGenerator> = match ImagenClient::from_env() {
            Ok(client) => Arc::new(client),
            Err(e) => unconfigured("infographic", imagen::API_KEY_ENV, e),
        };

        let poll_interval = Duration::from_secs(config.graphics.video_poll_interval_secs);
        let video: Arc<dyn VideoGenerator> = match VeoClient::from_env() {
            Ok(client) => Arc::new(client.with_polling(poll_interval, config.graphics.video_max_polls)),
            Err(e) => {
                warn!("Video backend disabled: {}", e);
                Arc::new(Unconfigured::new("video", veo::API_KEY_ENV))
            }
        };

        Ok(Self {
            llm,
            creative,
            infographic,
            video,
        })
    }
}

fn unconfigured(name: &str, env_var: &str, error: ProviderError) -> Arc<dyn ImageGenerator> {
    warn!("{} image backend disabled: {}", name, error);
    Arc::new(Unconfigured::new(name, env_var))
}

/// Assemble the application state from configuration, backends and a store
pub fn build_state(config: ApiConfig, backends: Backends, store: SqliteStore) -> Result<AppState, StartupError> {
    let content = ContentExtractor::new(config.research.clone())?;
    let facts = FactExtractor::new(backends.llm.clone(), &config.research);
    let researcher = Researcher::new(content, facts);

    let composer = WritingComposer::new(backends.llm.clone(), config.writer.clone())?;
    let graphics = GraphicRouter::new(
        backends.llm,
        backends.creative,
        backends.infographic,
        backends.video,
        config.graphics.clone(),
    );

    Ok(AppState::new(Pipeline::new(researcher, composer, graphics), store, config))
}

/// Start the API HTTP server
///
/// Validates configuration, opens the database, creates the backends and
/// serves until the process is stopped.
pub async fn start_server(config: ApiConfig) -> Result<(), StartupError> {
    config.validate()?;

    info!("Starting Quill API");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);

    let store = SqliteStore::new(&config.database_path)?;
    let backends = Backends::from_env(&config)?;
    let bind_addr = config.bind_addr();

    let app = create_router(build_state(config, backends, store)?);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("API listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| StartupError::Server(e.to_string()))?;

    Ok(())
}
