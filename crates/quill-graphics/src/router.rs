//! Graphic Generator Router
//!
//! Resolves a request to one [`GraphicKind`] and dispatches it:
//!
//! | kind                | backend                | research | on failure              |
//! |---------------------|------------------------|----------|-------------------------|
//! | video               | video                  | no       | `VideoUnavailable`      |
//! | infographic         | text-capable image     | yes      | creative image          |
//! | chart / diagram     | chart spec + SVG       | yes      | creative image          |
//! | conceptual, unknown | creative image         | no       | `CreativeUnavailable`   |
//!
//! Backend failures never escape as errors: they become a fallback or a
//! [`FailureReason`].

use crate::chart::ChartBackend;
use crate::classifier::classify_with_reason;
use crate::config::GraphicsConfig;
use crate::prompts::{creative_prompt, infographic_prompt, video_prompt, with_feedback, with_variation};
use quill_domain::{
    GraphicKind, GraphicRequest, ImageGenerator, LlmProvider, MediaPayload, ProviderError, RequestedType,
    ResearchResult, VideoGenerator,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Backend name reported for SVG charts
pub const CHART_BACKEND: &str = "chart-svg";

/// A successfully generated graphic
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGraphic {
    /// Resolved kind, kept for regeneration
    pub kind: GraphicKind,
    /// Backend that produced the payload
    pub backend: String,
    /// `data:<mime>;base64,<payload>`
    pub data_uri: String,
    /// Whether the primary backend failed and the creative one stood in
    pub fell_back: bool,
    /// Whether the chart carries invented example values
    pub illustrative: bool,
}

/// Why no graphic could be produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// Video backend failed; video has no fallback
    #[error("Video generation failed: {0}")]
    VideoUnavailable(ProviderError),

    /// Creative backend failed, directly or as a fallback
    #[error("Image generation failed: {0}")]
    CreativeUnavailable(ProviderError),

    /// Every variation rendering failed
    #[error("No variations could be generated")]
    NoVariations,

    /// Variations are not offered for this kind
    #[error("Variations are not supported for {0}")]
    VariationsUnsupported(GraphicKind),
}

/// Result of a routing pass
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// A graphic was produced
    Generated(GeneratedGraphic),
    /// Nothing could be produced
    Failed(FailureReason),
}

impl GenerationOutcome {
    /// The graphic, if one was produced
    pub fn graphic(&self) -> Option<&GeneratedGraphic> {
        match self {
            GenerationOutcome::Generated(graphic) => Some(graphic),
            GenerationOutcome::Failed(_) => None,
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<GeneratedGraphic, FailureReason> {
        match self {
            GenerationOutcome::Generated(graphic) => Ok(graphic),
            GenerationOutcome::Failed(reason) => Err(reason),
        }
    }
}

/// Resolve a request type to a concrete kind
///
/// `Auto` runs the classifier; explicit kinds are trusted; unrecognised
/// values go to the creative backend.
pub fn resolve_kind(description: &str, requested: &RequestedType) -> GraphicKind {
    match requested {
        RequestedType::Auto => {
            let classification = classify_with_reason(description);
            match classification.keyword {
                Some(keyword) => info!("Classified as {} (keyword '{}')", classification.kind, keyword),
                None => info!("Classified as {} (no keyword matched)", classification.kind),
            }
            classification.kind
        }
        RequestedType::Explicit(kind) => {
            debug!("Using requested type {}", kind);
            *kind
        }
        RequestedType::Unrecognized(raw) => {
            warn!("Unknown graphic type '{}', using the creative backend", raw);
            GraphicKind::Conceptual
        }
    }
}

/// Dispatches graphic requests to generation backends
pub struct GraphicRouter {
    chart: ChartBackend,
    creative: Arc<dyn ImageGenerator>,
    infographic: Arc<dyn ImageGenerator>,
    video: Arc<dyn VideoGenerator>,
    config: GraphicsConfig,
}

impl GraphicRouter {
    /// Create a router from its backends
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        creative: Arc<dyn ImageGenerator>,
        infographic: Arc<dyn ImageGenerator>,
        video: Arc<dyn VideoGenerator>,
        config: GraphicsConfig,
    ) -> Self {
        Self {
            chart: ChartBackend::new(llm, config.clone()),
            creative,
            infographic,
            video,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &GraphicsConfig {
        &self.config
    }

    /// Resolve and generate one graphic
    pub async fn generate(&self, request: &GraphicRequest, research: &[ResearchResult]) -> GenerationOutcome {
        let kind = resolve_kind(&request.description, &request.requested());
        self.generate_as(&request.description, kind, request.chart_data.as_deref(), research)
            .await
    }

    /// Regenerate with reviewer feedback, keeping the previous kind and data
    pub async fn regenerate_with_feedback(
        &self,
        description: &str,
        feedback: &str,
        kind: GraphicKind,
        chart_data: Option<&str>,
        research: &[ResearchResult],
    ) -> GenerationOutcome {
        info!("Regenerating {} with feedback", kind);
        self.generate_as(&with_feedback(description, feedback), kind, chart_data, research)
            .await
    }

    /// Produce several alternative renderings as data URIs
    ///
    /// Failed renderings are skipped; video is not supported.
    pub async fn generate_variations(
        &self,
        description: &str,
        kind: GraphicKind,
        chart_data: Option<&str>,
        research: &[ResearchResult],
    ) -> Result<Vec<String>, FailureReason> {
        if kind == GraphicKind::Video {
            return Err(FailureReason::VariationsUnsupported(kind));
        }

        let mut variations = Vec::with_capacity(self.config.variation_count);
        for index in 0..self.config.variation_count {
            match self
                .generate_as(&with_variation(description, index), kind, chart_data, research)
                .await
            {
                GenerationOutcome::Generated(graphic) => variations.push(graphic.data_uri),
                GenerationOutcome::Failed(reason) => warn!("Variation {} failed: {}", index + 1, reason),
            }
        }

        if variations.is_empty() {
            return Err(FailureReason::NoVariations);
        }
        info!("Generated {} of {} variations", variations.len(), self.config.variation_count);
        Ok(variations)
    }

    /// Generate for an already resolved kind
    pub async fn generate_as(
        &self,
        description: &str,
        kind: GraphicKind,
        chart_data: Option<&str>,
        research: &[ResearchResult],
    ) -> GenerationOutcome {
        // creative imagery never sees research facts
        let research: &[ResearchResult] = if kind.accepts_research() { research } else { &[] };

        match kind {
            GraphicKind::Video => self.video(description, kind).await,
            GraphicKind::Infographic => {
                let prompt = infographic_prompt(description, research, &self.config.palette);
                match non_empty(self.infographic.generate_image(&prompt).await) {
                    Ok(payload) => generated(kind, self.infographic.backend_name(), &payload, false, false),
                    Err(e) => {
                        warn!("Infographic backend failed ({}), falling back to creative", e);
                        self.creative(description, kind, true).await
                    }
                }
            }
            GraphicKind::Chart | GraphicKind::Diagram => {
                match self.chart.render(description, kind, chart_data, research).await {
                    Ok(chart) => generated(
                        kind,
                        CHART_BACKEND,
                        &chart.payload,
                        false,
                        chart.provenance.is_illustrative(),
                    ),
                    Err(e) => {
                        warn!("Chart backend failed ({}), falling back to creative", e);
                        self.creative(description, kind, true).await
                    }
                }
            }
            GraphicKind::Conceptual => self.creative(description, kind, false).await,
        }
    }

    async fn creative(&self, description: &str, kind: GraphicKind, fell_back: bool) -> GenerationOutcome {
        let prompt = creative_prompt(description, &self.config.palette);
        match non_empty(self.creative.generate_image(&prompt).await) {
            Ok(payload) => generated(kind, self.creative.backend_name(), &payload, fell_back, false),
            Err(e) => {
                warn!("Creative backend failed: {}", e);
                GenerationOutcome::Failed(FailureReason::CreativeUnavailable(e))
            }
        }
    }

    async fn video(&self, description: &str, kind: GraphicKind) -> GenerationOutcome {
        let duration = self.config.video_duration_secs;
        let prompt = video_prompt(description, duration, &self.config.palette);
        match non_empty(self.video.generate_video(&prompt, duration).await) {
            Ok(payload) => generated(kind, self.video.backend_name(), &payload, false, false),
            Err(e) => {
                warn!("Video backend failed: {}", e);
                GenerationOutcome::Failed(FailureReason::VideoUnavailable(e))
            }
        }
    }
}

fn non_empty(result: Result<MediaPayload, ProviderError>) -> Result<MediaPayload, ProviderError> {
    match result {
        Ok(payload) if payload.is_empty() => Err(ProviderError::EmptyResponse("no media bytes".to_string())),
        other => other,
    }
}

fn generated(
    kind: GraphicKind,
    backend: &str,
    payload: &MediaPayload,
    fell_back: bool,
    illustrative: bool,
) -> GenerationOutcome {
    info!("Generated {} via {} ({} bytes)", kind, backend, payload.bytes.len());
    GenerationOutcome::Generated(GeneratedGraphic {
        kind,
        backend: backend.to_string(),
        data_uri: payload.to_data_uri(),
        fell_back,
        illustrative,
    })
}
