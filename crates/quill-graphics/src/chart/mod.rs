//! Chart and diagram backend
//!
//! The language model never writes plotting code. It answers with a small
//! JSON [`ChartSpec`] which [`render_svg`] draws with fixed styling. Whether
//! the figure is captioned as illustrative depends only on where the data
//! came from ([`DataProvenance`]).

pub mod data;
pub mod prompt;
pub mod render;
pub mod spec;

pub use data::{ChartData, ChartInputs, DataProvenance};
pub use prompt::chart_spec_prompt;
pub use render::{render_svg, RenderOptions, ILLUSTRATIVE_CAPTION};
pub use spec::{ChartSpec, ChartType, DataPoint};

use crate::config::GraphicsConfig;
use crate::error::GraphicsError;
use quill_domain::media::MIME_SVG;
use quill_domain::{GenerationOptions, GraphicKind, LlmProvider, MediaPayload, ResearchResult};
use std::sync::Arc;
use tracing::{debug, info};

/// A rendered chart and the provenance of its data
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    /// SVG payload
    pub payload: MediaPayload,
    /// Where the plotted values came from
    pub provenance: DataProvenance,
}

/// Chart backend: spec prompt, model call, parse, render
pub struct ChartBackend {
    llm: Arc<dyn LlmProvider>,
    config: GraphicsConfig,
}

impl ChartBackend {
    /// Create a backend around a language model
    pub fn new(llm: Arc<dyn LlmProvider>, config: GraphicsConfig) -> Self {
        Self { llm, config }
    }

    /// Produce a chart or diagram for `description`
    ///
    /// User `chart_data` takes priority over research facts. Any failure is
    /// returned as an error for the router to fall back on.
    pub async fn render(
        &self,
        description: &str,
        kind: GraphicKind,
        chart_data: Option<&str>,
        research: &[ResearchResult],
    ) -> Result<RenderedChart, GraphicsError> {
        let inputs = ChartInputs::gather(chart_data, research);
        let prompt = chart_spec_prompt(description, kind, inputs.data_instruction.as_deref(), &self.config);
        debug!("Chart spec prompt: {} chars", prompt.len());

        let options = GenerationOptions::with_max_tokens(self.config.chart_max_tokens);
        let response = self.llm.generate(&prompt, &options).await?;

        let mut spec = ChartSpec::parse(&response)?;
        if spec.source_note.is_none() && !inputs.sources.is_empty() {
            spec.source_note = Some(inputs.sources.join(", "));
        }

        let svg = render_svg(
            &spec,
            &RenderOptions {
                width: self.config.chart_width_px,
                height: self.config.chart_height_px,
                palette: &self.config.palette,
                illustrative: inputs.provenance.is_illustrative(),
            },
        )?;

        info!(
            "Rendered {:?} {} ({:?} data, {} bytes)",
            spec.chart_type,
            kind,
            inputs.provenance,
            svg.len()
        );
        Ok(RenderedChart {
            payload: MediaPayload::new(MIME_SVG, svg.into_bytes()),
            provenance: inputs.provenance,
        })
    }
}
