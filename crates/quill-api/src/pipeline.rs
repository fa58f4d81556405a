//! Submission pipeline: research, draft, graphic
//!
//! Turns a raw submission into a record ready for the review queue. Only a
//! drafting failure aborts the submission; a missing graphic is stored as
//! absent.

use crate::error::ApiError;
use quill_domain::{DataSource, GraphicRequest, NewSubmission, ResearchResult};
use quill_graphics::{resolve_kind, GenerationOutcome, GraphicRouter};
use quill_research::Researcher;
use quill_writer::WritingComposer;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// Body of `POST /api/submit-idea`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitIdeaRequest {
    /// Author display name
    pub author: String,
    /// Raw idea to draft from
    #[serde(default)]
    pub idea: Option<String>,
    /// Graphic to generate
    #[serde(default)]
    pub graphic_description: Option<String>,
    /// Requested graphic type; absent or `auto` classifies the description
    #[serde(default)]
    pub graphic_type: Option<String>,
    /// JSON object with `dataPoints` or `startValue`/`endValue`/`timePeriod`
    #[serde(default)]
    pub chart_data: Option<String>,
    /// Declared data sources, as an array or a JSON-encoded string
    #[serde(default)]
    pub data_sources: Option<Value>,
    /// URLs to research, as an array or a JSON-encoded string
    #[serde(default)]
    pub research_urls: Option<Value>,
    /// Author-supplied image, base64 or a data URI
    #[serde(default)]
    pub uploaded_image: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SubmitIdeaRequest {
    /// Non-blank idea
    pub fn idea(&self) -> Option<&str> {
        present(&self.idea)
    }

    /// Non-blank graphic description
    pub fn graphic_description(&self) -> Option<&str> {
        present(&self.graphic_description)
    }

    /// Non-blank uploaded image
    pub fn uploaded_image(&self) -> Option<&str> {
        present(&self.uploaded_image)
    }

    /// Research topic: the idea, else the graphic description
    pub fn topic(&self) -> &str {
        self.idea().or_else(|| self.graphic_description()).unwrap_or("")
    }
}

/// Decode a list field sent either as a JSON array or a JSON-encoded string
///
/// Anything unparseable is logged and treated as absent.
pub fn lenient_list<T: DeserializeOwned>(field: &str, value: Option<&Value>) -> Vec<T> {
    let parsed = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::String(raw)) if raw.trim().is_empty() => return Vec::new(),
        Some(Value::String(raw)) => serde_json::from_str::<Vec<T>>(raw),
        Some(other) => serde_json::from_value::<Vec<T>>(other.clone()),
    };

    match parsed {
        Ok(items) => items,
        Err(e) => {
            warn!("Failed to parse {} JSON: {}", field, e);
            Vec::new()
        }
    }
}

/// Normalize an uploaded image to a data URI
pub fn uploaded_image_uri(raw: &str) -> String {
    if raw.starts_with("data:") {
        raw.to_string()
    } else {
        format!("data:image/png;base64,{}", raw)
    }
}

/// The components a submission passes through
pub struct Pipeline {
    /// Research stage
    pub researcher: Researcher,
    /// Drafting stage
    pub composer: WritingComposer,
    /// Graphic stage
    pub graphics: GraphicRouter,
}

impl Pipeline {
    /// Create a pipeline from its stages
    pub fn new(researcher: Researcher, composer: WritingComposer, graphics: GraphicRouter) -> Self {
        Self {
            researcher,
            composer,
            graphics,
        }
    }

    /// Run a submission through research, drafting and graphic generation
    pub async fn prepare(&self, request: &SubmitIdeaRequest) -> Result<NewSubmission, ApiError> {
        if request.idea().is_none() && request.graphic_description().is_none() && request.uploaded_image().is_none() {
            return Err(ApiError::BadRequest(
                "Must provide either an idea, a graphic description, or an uploaded image".to_string(),
            ));
        }
        info!("Received submission from {}", request.author);

        let data_sources: Vec<DataSource> = lenient_list("data_sources", request.data_sources.as_ref());
        let urls: Vec<String> = lenient_list("research_urls", request.research_urls.as_ref());

        let research = if urls.is_empty() {
            Vec::new()
        } else {
            info!("Processing {} research URLs", urls.len());
            self.researcher.process_research_urls(&urls, request.topic()).await
        };

        let ai_draft = match request.idea() {
            Some(idea) => {
                let post = self
                    .composer
                    .draft_post(idea, &request.author, &research, &data_sources)
                    .await?;
                info!("AI draft generated: {} chars", post.text.chars().count());
                Some(post.text)
            }
            None => {
                info!("No idea provided, skipping AI draft generation");
                None
            }
        };

        let (graphic_type, graphic_data) = self.graphic(request, &research).await;

        Ok(NewSubmission {
            author: request.author.clone(),
            raw_input: request.idea().unwrap_or("").to_string(),
            ai_draft,
            graphic_description: request.graphic_description().map(str::to_string),
            graphic_type,
            graphic_data,
            chart_data: request
                .graphic_description()
                .and(present(&request.chart_data))
                .map(str::to_string),
            data_sources: (!data_sources.is_empty()).then_some(data_sources),
            research_results: (!research.is_empty()).then_some(research),
        })
    }

    /// Resolved type and data URI of the submission's graphic
    ///
    /// An uploaded image is stored as-is; the type is still resolved so the
    /// graphic can be regenerated later.
    async fn graphic(
        &self,
        request: &SubmitIdeaRequest,
        research: &[ResearchResult],
    ) -> (Option<String>, Option<String>) {
        let uploaded = request.uploaded_image().map(uploaded_image_uri);
        let Some(description) = request.graphic_description() else {
            return (None, uploaded);
        };

        let mut graphic = GraphicRequest::new(description);
        if let Some(requested) = present(&request.graphic_type) {
            graphic = graphic.with_type(requested);
        }
        if let Some(chart_data) = present(&request.chart_data) {
            graphic = graphic.with_chart_data(chart_data);
        }
        let kind = resolve_kind(description, &graphic.requested());
        let graphic_type = Some(kind.as_str().to_string());

        if uploaded.is_some() {
            info!("Using uploaded image instead of generating a {}", kind);
            return (graphic_type, uploaded);
        }

        match self
            .graphics
            .generate_as(description, kind, graphic.chart_data.as_deref(), research)
            .await
        {
            GenerationOutcome::Generated(generated) => {
                info!("Graphic generated via {} ({} chars)", generated.backend, generated.data_uri.len());
                (graphic_type, Some(generated.data_uri))
            }
            GenerationOutcome::Failed(reason) => {
                warn!("Graphic generation failed: {}", reason);
                (graphic_type, None)
            }
        }
    }
}
