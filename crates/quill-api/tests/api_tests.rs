//! Integration tests for the review API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use quill_api::{
    build_state,
    config::ApiConfig,
    handlers::{create_router, AppState},
    Backends,
};
use quill_domain::{ProviderError, SubmissionId, SubmissionStatus, SubmissionStore};
use quill_llm::{MockImageGenerator, MockProvider, MockVideoGenerator};
use quill_store::SqliteStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const DRAFT: &str = "Safety stock hides bad forecasts.\n\nFix the forecast and the buffer shrinks on its own.";

const BAR_SPEC: &str = r#"{"type": "bar", "title": "Forecast accuracy", "points": [{"label": "Q1", "value": 61}, {"label": "Q2", "value": 74}]}"#;

struct Mocks {
    llm: MockProvider,
    creative: MockImageGenerator,
    video: MockVideoGenerator,
}

impl Mocks {
    fn new() -> Self {
        let mut llm = MockProvider::new(BAR_SPEC);
        llm.add_response("RAW INSIGHT FROM", DRAFT);
        Self {
            llm,
            creative: MockImageGenerator::succeeding("creative"),
            video: MockVideoGenerator::succeeding(),
        }
    }

    fn state(&self) -> AppState {
        let backends = Backends {
            llm: Arc::new(self.llm.clone()),
            creative: Arc::new(self.creative.clone()),
            infographic: Arc::new(MockImageGenerator::succeeding("infographic")),
            video: Arc::new(self.video.clone()),
        };
        let store = SqliteStore::new(":memory:").unwrap();
        build_state(ApiConfig::default(), backends, store).unwrap()
    }
}

async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = create_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn submit(state: &AppState, body: Value) -> String {
    let (status, response) = send(state, "POST", "/api/submit-idea", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{}", response);

    let (_, pending) = send(state, "GET", "/api/pending-submissions", None).await;
    pending[0]["id"].as_str().unwrap().to_string()
}

fn stored(state: &AppState, id: &str) -> quill_domain::Submission {
    let id = SubmissionId::from_string(id).unwrap();
    state.store.lock().unwrap().get_submission(id).unwrap().unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let state = Mocks::new().state();
    let (status, body) = send(&state, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Quill Writing API");
}

#[tokio::test]
async fn test_submit_requires_content() {
    let state = Mocks::new().state();
    let (status, body) = send(
        &state,
        "POST",
        "/api/submit-idea",
        Some(json!({"author": "Dana", "idea": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Must provide either an idea, a graphic description, or an uploaded image"
    );
}

#[tokio::test]
async fn test_submit_idea_with_graphic() {
    let mocks = Mocks::new();
    let state = mocks.state();

    let (status, body) = send(
        &state,
        "POST",
        "/api/submit-idea",
        Some(json!({
            "author": "Dana",
            "idea": "Safety stock is a tax on bad forecasts",
            "graphic_description": "A warehouse at dawn",
            "data_sources": r#"[{"dataPoint": "Turns", "value": "4.2 to 7.8", "sourceType": "client"}]"#,
            "research_urls": "[not json",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Your idea has been submitted and is queued for review.");

    let (status, pending) = send(&state, "GET", "/api/pending-submissions", None).await;
    assert_eq!(status, StatusCode::OK);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);

    let submission = &pending[0];
    assert_eq!(submission["author"], "Dana");
    assert_eq!(submission["raw_input"], "Safety stock is a tax on bad forecasts");
    assert_eq!(submission["ai_draft"], DRAFT);
    assert_eq!(submission["graphic_type"], "conceptual");
    assert_eq!(submission["status"], "pending_review");
    assert!(submission["graphic_data"].as_str().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(submission["data_sources"][0]["dataPoint"], "Turns");
    assert!(submission["research_results"].is_null());

    let calls = mocks.llm.calls();
    let draft_prompt = &calls[0].prompt;
    assert!(draft_prompt.contains("Turns: 4.2 to 7.8 (Source: Client data (confidential))"));
}

#[tokio::test]
async fn test_submit_chart_uses_user_data() {
    let mocks = Mocks::new();
    let state = mocks.state();

    let id = submit(
        &state,
        json!({
            "author": "Dana",
            "graphic_description": "Bar chart of forecast accuracy",
            "graphic_type": "chart",
            "chart_data": r#"{"dataPoints": "Q1: 61, Q2: 74"}"#,
        }),
    )
    .await;

    let submission = stored(&state, &id);
    assert_eq!(submission.ai_draft, None);
    assert_eq!(submission.raw_input, "");
    assert_eq!(submission.graphic_type.as_deref(), Some("chart"));
    assert!(submission.graphic_data.unwrap().starts_with("data:image/svg+xml;base64,"));
    assert!(mocks.llm.last_prompt().unwrap().contains("Q1: 61, Q2: 74"));
    assert_eq!(mocks.creative.call_count(), 0);
}

#[tokio::test]
async fn test_uploaded_image_is_stored() {
    let mocks = Mocks::new();
    let state = mocks.state();

    let id = submit(&state, json!({"author": "Dana", "uploaded_image": "iVBORw0KGgo="})).await;

    let submission = stored(&state, &id);
    assert_eq!(submission.graphic_data.as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));
    assert_eq!(submission.graphic_type, None);
    assert_eq!(mocks.llm.call_count(), 0);
    assert_eq!(mocks.creative.call_count(), 0);
}

#[tokio::test]
async fn test_graphic_failure_still_queues_submission() {
    let mut mocks = Mocks::new();
    mocks.creative = MockImageGenerator::failing("creative", ProviderError::RateLimitExceeded);
    let state = mocks.state();

    let id = submit(
        &state,
        json!({"author": "Dana", "idea": "Forecasts lie", "graphic_description": "A warehouse at dawn"}),
    )
    .await;

    let submission = stored(&state, &id);
    assert_eq!(submission.graphic_data, None);
    assert_eq!(submission.graphic_type.as_deref(), Some("conceptual"));
    assert_eq!(submission.ai_draft.as_deref(), Some(DRAFT));
}

#[tokio::test]
async fn test_draft_failure_is_server_error() {
    let mocks = Mocks::new();
    mocks.llm.push_error(ProviderError::Timeout("slow".into()));
    let state = mocks.state();

    let (status, body) = send(
        &state,
        "POST",
        "/api/submit-idea",
        Some(json!({"author": "Dana", "idea": "Forecasts lie"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(state.store.lock().unwrap().count().unwrap(), 0);
}

#[tokio::test]
async fn test_approve_submission() {
    let state = Mocks::new().state();
    let id = submit(&state, json!({"author": "Dana", "idea": "Forecasts lie"})).await;

    let uri = format!("/api/approve-submission/{}", id);
    let (status, _) = send(&state, "POST", &uri, Some(json!({"edited_post": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&state, "POST", &uri, Some(json!({"edited_post": "x".repeat(3001)}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&state, "POST", &uri, Some(json!({"edited_post": "Final text"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Submission approved successfully.");

    let submission = stored(&state, &id);
    assert_eq!(submission.status, SubmissionStatus::Approved);
    assert_eq!(submission.ai_draft.as_deref(), Some("Final text"));
    assert!(submission.reviewed_at.is_some());

    let (_, pending) = send(&state, "GET", "/api/pending-submissions", None).await;
    assert!(pending.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reject_submission() {
    let state = Mocks::new().state();
    let id = submit(&state, json!({"author": "Dana", "idea": "Forecasts lie"})).await;

    let uri = format!("/api/reject-submission/{}", id);
    let (status, body) = send(&state, "POST", &uri, Some(json!({"reason": "Off topic"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Submission rejected.");

    let submission = stored(&state, &id);
    assert_eq!(submission.status, SubmissionStatus::Rejected);
    assert_eq!(submission.rejection_reason.as_deref(), Some("Off topic"));
}

#[tokio::test]
async fn test_unknown_submission_is_not_found() {
    let state = Mocks::new().state();

    let missing = SubmissionId::new().to_string();
    for uri in [
        format!("/api/approve-submission/{}", missing),
        "/api/approve-submission/not-a-uuid".to_string(),
    ] {
        let (status, body) = send(&state, "POST", &uri, Some(json!({"edited_post": "text"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Submission not found");
    }

    let (status, _) = send(&state, "POST", &format!("/api/generate-variations/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_regenerate_image() {
    let mocks = Mocks::new();
    let state = mocks.state();
    let id = submit(
        &state,
        json!({"author": "Dana", "graphic_description": "A warehouse at dawn"}),
    )
    .await;

    let uri = format!("/api/regenerate-image/{}", id);
    let (status, _) = send(&state, "POST", &uri, Some(json!({"feedback": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&state, "POST", &uri, Some(json!({"feedback": "warmer colours"}))).await;
    assert_eq!(status, StatusCode::OK);
    let new_image = body["new_image_data"].as_str().unwrap();
    assert!(new_image.starts_with("data:image/png;base64,"));
    assert_eq!(stored(&state, &id).graphic_data.as_deref(), Some(new_image));

    let prompts = mocks.creative.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("A warehouse at dawn\n\nAdjustments requested: warmer colours"));
}

#[tokio::test]
async fn test_regenerated_chart_keeps_user_data() {
    let mocks = Mocks::new();
    let state = mocks.state();
    let id = submit(
        &state,
        json!({
            "author": "Dana",
            "graphic_description": "Bar chart of forecast accuracy",
            "graphic_type": "chart",
            "chart_data": r#"{"dataPoints": "Q1: 61, Q2: 74"}"#,
        }),
    )
    .await;
    assert_eq!(
        stored(&state, &id).chart_data.as_deref(),
        Some(r#"{"dataPoints": "Q1: 61, Q2: 74"}"#)
    );

    let (status, body) = send(
        &state,
        "POST",
        &format!("/api/regenerate-image/{}", id),
        Some(json!({"feedback": "label the bars"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["new_image_data"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));

    let prompt = mocks.llm.last_prompt().unwrap();
    assert!(prompt.contains("Adjustments requested: label the bars"));
    assert!(prompt.contains("Q1: 61, Q2: 74"));

    let (status, _) = send(&state, "POST", &format!("/api/generate-variations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let calls = mocks.llm.calls();
    assert_eq!(calls.len(), 5);
    assert!(calls[2..].iter().all(|call| call.prompt.contains("Q1: 61, Q2: 74")));
    assert_eq!(mocks.creative.call_count(), 0);
}

#[tokio::test]
async fn test_regenerate_requires_graphic() {
    let state = Mocks::new().state();
    let id = submit(&state, json!({"author": "Dana", "idea": "Forecasts lie"})).await;

    let (status, body) = send(
        &state,
        "POST",
        &format!("/api/regenerate-image/{}", id),
        Some(json!({"feedback": "warmer"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This submission does not have graphic generation enabled");
}

#[tokio::test]
async fn test_regenerate_failure_is_server_error() {
    let mut mocks = Mocks::new();
    let state = mocks.state();
    let id = submit(
        &state,
        json!({"author": "Dana", "graphic_description": "A warehouse at dawn"}),
    )
    .await;

    mocks.creative = MockImageGenerator::failing("creative", ProviderError::Other("down".into()));
    let failing = AppState {
        store: state.store.clone(),
        ..mocks.state()
    };

    let (status, body) = send(
        &failing,
        "POST",
        &format!("/api/regenerate-image/{}", id),
        Some(json!({"feedback": "warmer"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to regenerate image");
}

#[tokio::test]
async fn test_variations_and_selection() {
    let mocks = Mocks::new();
    let state = mocks.state();
    let id = submit(
        &state,
        json!({"author": "Dana", "graphic_description": "A warehouse at dawn"}),
    )
    .await;

    let (status, body) = send(&state, "POST", &format!("/api/generate-variations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let variations = body["variations"].as_array().unwrap();
    assert_eq!(variations.len(), 3);

    let chosen = variations[2].as_str().unwrap();
    let (status, body) = send(
        &state,
        "POST",
        &format!("/api/select-variation/{}", id),
        Some(json!({"image_data": chosen})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Selected variation has been set as the main graphic.");
    assert_eq!(stored(&state, &id).graphic_data.as_deref(), Some(chosen));
}

#[tokio::test]
async fn test_no_variations_for_video() {
    let mocks = Mocks::new();
    let state = mocks.state();
    let id = submit(
        &state,
        json!({"author": "Dana", "graphic_description": "An animated explainer video of replenishment"}),
    )
    .await;
    assert_eq!(stored(&state, &id).graphic_type.as_deref(), Some("video"));
    assert_eq!(mocks.video.call_count(), 1);

    let (status, body) = send(&state, "POST", &format!("/api/generate-variations/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Variations are not available for video content");
}

#[tokio::test]
async fn test_pending_submissions_newest_first() {
    let state = Mocks::new().state();
    let first = submit(&state, json!({"author": "Ana", "idea": "First idea"})).await;
    let second = submit(&state, json!({"author": "Ben", "idea": "Second idea"})).await;

    let (_, pending) = send(&state, "GET", "/api/pending-submissions", None).await;
    let ids: Vec<&str> = pending
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}
