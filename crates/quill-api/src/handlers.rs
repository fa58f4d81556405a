//! HTTP request handlers for the review API.
//!
//! Submission intake, the pending-review queue, approve/reject, and graphic
//! regeneration and variations.

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::pipeline::{Pipeline, SubmitIdeaRequest};
use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::Utc;
use quill_domain::{GraphicKind, RequestedType, Submission, SubmissionId, SubmissionPatch, SubmissionStore};
use quill_graphics::{resolve_kind, FailureReason, GenerationOutcome};
use quill_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const SERVICE_NAME: &str = "Quill Writing API";
const MAX_EDITED_POST_CHARS: usize = 3000;
const MAX_FEEDBACK_CHARS: usize = 1000;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Research, drafting and graphic stages
    pub pipeline: Arc<Pipeline>,
    /// Submission store; SQLite connections are not shared between threads
    pub store: Arc<Mutex<SqliteStore>>,
    /// Loaded configuration
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Bundle a pipeline, store and configuration
    pub fn new(pipeline: Pipeline, store: SqliteStore, config: ApiConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store: Arc::new(Mutex::new(store)),
            config: Arc::new(config),
        }
    }

    /// Lock the store; never held across an await
    fn store(&self) -> MutexGuard<'_, SqliteStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn find(&self, raw_id: &str) -> Result<Submission, ApiError> {
        let id = SubmissionId::from_string(raw_id).map_err(|_| ApiError::submission_not_found())?;
        self.store().get_submission(id)?.ok_or_else(ApiError::submission_not_found)
    }

    fn patch(&self, id: SubmissionId, patch: SubmissionPatch) -> Result<Submission, ApiError> {
        self.store()
            .update_submission(id, patch)?
            .ok_or_else(ApiError::submission_not_found)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" when the server answers
    pub status: String,
    /// Service name
    pub service: String,
}

/// Generic success response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always `true`
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

impl SuccessResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

/// Approve request
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// Final post text
    pub edited_post: String,
}

/// Reject request
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    /// Optional reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// Regenerate request
#[derive(Debug, Deserialize)]
pub struct RegenerateImageRequest {
    /// Reviewer feedback for the new rendering
    pub feedback: String,
}

/// Regenerate response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegenerateImageResponse {
    /// New graphic as a data URI
    pub new_image_data: String,
}

/// Variations response
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateVariationsResponse {
    /// Alternative renderings as data URIs
    pub variations: Vec<String>,
}

/// Select-variation request
#[derive(Debug, Deserialize)]
pub struct SelectVariationRequest {
    /// Chosen variation's data URI
    pub image_data: String,
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(ApiError::BadRequest(format!(
            "{} must be between 1 and {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Stored description and kind, for submissions that have a generated graphic
fn graphic_source(submission: &Submission) -> Result<(&str, GraphicKind), ApiError> {
    match (submission.graphic_type.as_deref(), submission.graphic_description.as_deref()) {
        (Some(graphic_type), Some(description)) if !description.trim().is_empty() => {
            let kind = resolve_kind(description, &RequestedType::from_raw(Some(graphic_type)));
            Ok((description, kind))
        }
        _ => Err(ApiError::BadRequest(
            "This submission does not have graphic generation enabled".to_string(),
        )),
    }
}

/// GET / - Health check
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// POST /api/submit-idea - Research, draft, generate and queue for review
async fn submit_idea(
    State(state): State<AppState>,
    Json(request): Json<SubmitIdeaRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let submission = state.pipeline.prepare(&request).await?;
    let stored = state.store().create_submission(submission)?;
    info!("Submission {} queued for review", stored.id);

    Ok(SuccessResponse::new(
        "Your idea has been submitted and is queued for review.",
    ))
}

/// GET /api/pending-submissions - Pending submissions, newest first
async fn pending_submissions(State(state): State<AppState>) -> Result<Json<Vec<Submission>>, ApiError> {
    let pending = state.store().list_pending()?;
    Ok(Json(pending))
}

/// POST /api/approve-submission/:id
async fn approve_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let submission = state.find(&id)?;
    check_length("edited_post", &request.edited_post, MAX_EDITED_POST_CHARS)?;

    state.patch(submission.id, SubmissionPatch::approve(request.edited_post, Utc::now()))?;
    info!("Approved submission {}", submission.id);
    Ok(SuccessResponse::new("Submission approved successfully."))
}

/// POST /api/reject-submission/:id
async fn reject_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let submission = state.find(&id)?;
    let reason = request.reason.filter(|r| !r.trim().is_empty());

    state.patch(submission.id, SubmissionPatch::reject(reason, Utc::now()))?;
    info!("Rejected submission {}", submission.id);
    Ok(SuccessResponse::new("Submission rejected."))
}

/// POST /api/regenerate-image/:id - Regenerate the graphic with feedback
async fn regenerate_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RegenerateImageRequest>,
) -> Result<Json<RegenerateImageResponse>, ApiError> {
    let submission = state.find(&id)?;
    check_length("feedback", &request.feedback, MAX_FEEDBACK_CHARS)?;
    let (description, kind) = graphic_source(&submission)?;
    let research = submission.research_results.as_deref().unwrap_or_default();

    let outcome = state
        .pipeline
        .graphics
        .regenerate_with_feedback(
            description,
            &request.feedback,
            kind,
            submission.chart_data.as_deref(),
            research,
        )
        .await;

    match outcome {
        GenerationOutcome::Generated(graphic) => {
            state.patch(submission.id, SubmissionPatch::graphic(graphic.data_uri.clone()))?;
            info!("Regenerated {} for submission {}", kind, submission.id);
            Ok(Json(RegenerateImageResponse {
                new_image_data: graphic.data_uri,
            }))
        }
        GenerationOutcome::Failed(reason) => {
            warn!("Regeneration failed for {}: {}", submission.id, reason);
            Err(ApiError::Internal("Failed to regenerate image".to_string()))
        }
    }
}

/// POST /api/generate-variations/:id - Alternative renderings to choose from
async fn generate_variations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GenerateVariationsResponse>, ApiError> {
    let submission = state.find(&id)?;
    let (description, kind) = graphic_source(&submission)?;
    let research = submission.research_results.as_deref().unwrap_or_default();

    let chart_data = submission.chart_data.as_deref();

    match state
        .pipeline
        .graphics
        .generate_variations(description, kind, chart_data, research)
        .await
    {
        Ok(variations) => Ok(Json(GenerateVariationsResponse { variations })),
        Err(FailureReason::VariationsUnsupported(_)) => Err(ApiError::BadRequest(
            "Variations are not available for video content".to_string(),
        )),
        Err(reason) => {
            warn!("Variations failed for {}: {}", submission.id, reason);
            Err(ApiError::Internal("Failed to generate variations".to_string()))
        }
    }
}

/// POST /api/select-variation/:id - Make a variation the main graphic
async fn select_variation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectVariationRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let submission = state.find(&id)?;
    if request.image_data.trim().is_empty() {
        return Err(ApiError::BadRequest("image_data must not be empty".to_string()));
    }

    state.patch(submission.id, SubmissionPatch::graphic(request.image_data))?;
    info!("Variation selected for submission {}", submission.id);
    Ok(SuccessResponse::new(
        "Selected variation has been set as the main graphic.",
    ))
}

/// CORS layer for the configured origins; `*` allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let cors = cors_layer(&state.config.cors_origins);

    AxumRouter::new()
        .route("/", get(health_check))
        .route("/api/submit-idea", post(submit_idea))
        .route("/api/pending-submissions", get(pending_submissions))
        .route("/api/approve-submission/:id", post(approve_submission))
        .route("/api/reject-submission/:id", post(reject_submission))
        .route("/api/regenerate-image/:id", post(regenerate_image))
        .route("/api/generate-variations/:id", post(generate_variations))
        .route("/api/select-variation/:id", post(select_variation))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
