//! Routing behaviour of the graphic generator against mock backends

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use quill_domain::{Fact, FactType, GraphicKind, GraphicRequest, ProviderError, ResearchResult};
use quill_graphics::chart::ILLUSTRATIVE_CAPTION;
use quill_graphics::{FailureReason, GenerationOutcome, GraphicRouter, GraphicsConfig};
use quill_llm::{MockImageGenerator, MockProvider, MockVideoGenerator};
use std::sync::Arc;

const BAR_SPEC: &str = r#"```json
{"type": "bar", "title": "Forecast accuracy", "points": [{"label": "Q1", "value": 100}, {"label": "Q2", "value": 120}]}
```"#;

struct Harness {
    llm: MockProvider,
    creative: MockImageGenerator,
    infographic: MockImageGenerator,
    video: MockVideoGenerator,
}

impl Harness {
    fn new() -> Self {
        Self {
            llm: MockProvider::new(BAR_SPEC),
            creative: MockImageGenerator::succeeding("creative"),
            infographic: MockImageGenerator::succeeding("infographic"),
            video: MockVideoGenerator::succeeding(),
        }
    }

    fn router(&self) -> GraphicRouter {
        GraphicRouter::new(
            Arc::new(self.llm.clone()),
            Arc::new(self.creative.clone()),
            Arc::new(self.infographic.clone()),
            Arc::new(self.video.clone()),
            GraphicsConfig::default(),
        )
    }
}

fn research() -> Vec<ResearchResult> {
    vec![ResearchResult {
        url: "https://www.mckinsey.com/report".to_string(),
        source_name: "mckinsey.com".to_string(),
        extracted_facts: vec![
            Fact {
                fact: "AI forecasting cuts errors by 30-50%".to_string(),
                fact_type: FactType::Statistic,
                citation_text: "According to McKinsey".to_string(),
            },
            Fact {
                fact: "\"Planning is a team sport\"".to_string(),
                fact_type: FactType::Quote,
                citation_text: String::new(),
            },
        ],
        summary: "Forecasting report".to_string(),
        relevance_score: 8,
        error: None,
    }]
}

fn svg_text(data_uri: &str) -> String {
    let encoded = data_uri
        .strip_prefix("data:image/svg+xml;base64,")
        .expect("expected an SVG data URI");
    String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap()
}

#[tokio::test]
async fn test_user_chart_data_has_no_disclaimer() {
    let harness = Harness::new();
    let request = GraphicRequest::new("Bar chart of forecast accuracy by quarter")
        .with_chart_data(r#"{"dataPoints": "Q1: 100, Q2: 120"}"#);

    let graphic = harness.router().generate(&request, &[]).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Chart);
    assert_eq!(graphic.backend, "chart-svg");
    assert!(!graphic.illustrative);
    assert!(!svg_text(&graphic.data_uri).contains(ILLUSTRATIVE_CAPTION));

    let prompt = harness.llm.last_prompt().unwrap();
    assert!(prompt.contains("IMPORTANT - USE THESE EXACT DATA POINTS (user-provided):\nQ1: 100, Q2: 120"));
    assert_eq!(harness.creative.call_count(), 0);
}

#[tokio::test]
async fn test_no_data_chart_has_disclaimer() {
    let harness = Harness::new();
    let request = GraphicRequest::new("Bar chart of forecast accuracy by quarter");

    let graphic = harness.router().generate(&request, &[]).await.into_result().unwrap();
    assert!(graphic.illustrative);
    assert!(svg_text(&graphic.data_uri).contains(ILLUSTRATIVE_CAPTION));
}

#[tokio::test]
async fn test_research_feeds_chart_prompt() {
    let harness = Harness::new();
    let request = GraphicRequest::new("Chart of forecast error reduction").with_type("chart");

    let graphic = harness.router().generate(&request, &research()).await.into_result().unwrap();
    assert!(!graphic.illustrative);
    let prompt = harness.llm.last_prompt().unwrap();
    assert!(prompt.contains("- AI forecasting cuts errors by 30-50% (Source: mckinsey.com)"));
    assert!(!prompt.contains("Planning is a team sport"));
    assert!(svg_text(&graphic.data_uri).contains("Source: mckinsey.com"));
}

#[tokio::test]
async fn test_invalid_chart_spec_falls_back_to_creative() {
    let harness = Harness::new();
    harness.llm.push_response("import matplotlib.pyplot as plt\nplt.bar([1], [2])");
    let request = GraphicRequest::new("Bar chart of stockouts by region");

    let graphic = harness.router().generate(&request, &research()).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Chart);
    assert_eq!(graphic.backend, "creative");
    assert!(graphic.fell_back);
    assert!(graphic.data_uri.starts_with("data:image/png;base64,"));

    // fallback uses the original description and no research
    let prompts = harness.creative.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Create: Bar chart of stockouts by region"));
    assert!(!prompts[0].contains("mckinsey"));
}

#[tokio::test]
async fn test_out_of_range_chart_values_fall_back_to_creative() {
    let harness = Harness::new();
    harness.llm.push_response(
        r#"{"type": "bar", "points": [{"label": "a", "value": 1.7e308}, {"label": "b", "value": -1.7e308}]}"#,
    );
    let request = GraphicRequest::new("Bar chart of stockouts by region");

    let graphic = harness.router().generate(&request, &[]).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Chart);
    assert_eq!(graphic.backend, "creative");
    assert!(graphic.fell_back);
    assert_eq!(harness.creative.call_count(), 1);
}

#[tokio::test]
async fn test_llm_failure_falls_back_to_creative() {
    let harness = Harness::new();
    harness.llm.push_error(ProviderError::Timeout("slow".into()));
    let request = GraphicRequest::new("Process flow").with_type("diagram");

    let graphic = harness.router().generate(&request, &[]).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Diagram);
    assert!(graphic.fell_back);
    assert_eq!(harness.creative.call_count(), 1);
}

#[tokio::test]
async fn test_video_takes_precedence_and_has_no_fallback() {
    let mut harness = Harness::new();
    let request = GraphicRequest::new("Animated infographic video of a bar chart");

    let graphic = harness.router().generate(&request, &research()).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Video);
    assert!(graphic.data_uri.starts_with("data:video/mp4;base64,"));
    assert!(!harness.video.prompts()[0].contains("mckinsey"));
    assert_eq!(harness.llm.call_count(), 0);

    harness.video = MockVideoGenerator::failing(ProviderError::Timeout("30 polls".into()));
    let outcome = harness.router().generate(&request, &[]).await;
    assert_eq!(
        outcome,
        GenerationOutcome::Failed(FailureReason::VideoUnavailable(ProviderError::Timeout("30 polls".into())))
    );
    assert_eq!(harness.creative.call_count(), 0);
}

#[tokio::test]
async fn test_infographic_gets_research_and_falls_back() {
    let mut harness = Harness::new();
    let request = GraphicRequest::new("Key metrics for retail forecasting");

    let graphic = harness.router().generate(&request, &research()).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Infographic);
    assert_eq!(graphic.backend, "infographic");
    assert!(harness.infographic.prompts()[0].contains("Use these real statistics and facts:"));

    harness.infographic = MockImageGenerator::failing("infographic", ProviderError::MissingCredentials("GOOGLE_API_KEY".into()));
    let graphic = harness.router().generate(&request, &research()).await.into_result().unwrap();
    assert_eq!(graphic.backend, "creative");
    assert!(graphic.fell_back);
    assert!(!harness.creative.prompts()[0].contains("mckinsey"));
}

#[tokio::test]
async fn test_conceptual_never_sees_research() {
    let harness = Harness::new();
    let request = GraphicRequest::new("A warehouse at dawn with robots");

    let graphic = harness.router().generate(&request, &research()).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Conceptual);
    assert!(!graphic.fell_back);
    let prompts = harness.creative.prompts();
    let prompt = &prompts[0];
    assert!(!prompt.contains("AI forecasting cuts errors"));
    assert!(!prompt.contains("mckinsey"));
}

#[tokio::test]
async fn test_unknown_type_uses_creative() {
    let harness = Harness::new();
    let request = GraphicRequest::new("Bar chart of sales").with_type("hologram");

    let graphic = harness.router().generate(&request, &research()).await.into_result().unwrap();
    assert_eq!(graphic.kind, GraphicKind::Conceptual);
    assert_eq!(graphic.backend, "creative");
    assert_eq!(harness.llm.call_count(), 0);
}

#[tokio::test]
async fn test_creative_failure_is_reported() {
    let mut harness = Harness::new();
    harness.creative = MockImageGenerator::failing("creative", ProviderError::RateLimitExceeded);
    let request = GraphicRequest::new("A calm supply chain team meeting");

    let outcome = harness.router().generate(&request, &[]).await;
    assert_eq!(
        outcome,
        GenerationOutcome::Failed(FailureReason::CreativeUnavailable(ProviderError::RateLimitExceeded))
    );
}

#[tokio::test]
async fn test_regenerate_keeps_kind() {
    let harness = Harness::new();
    let router = harness.router();

    // description alone would classify as video
    let graphic = router
        .regenerate_with_feedback("An animated warehouse", "warmer colours", GraphicKind::Conceptual, None, &[])
        .await
        .into_result()
        .unwrap();
    assert_eq!(graphic.kind, GraphicKind::Conceptual);
    assert_eq!(harness.video.call_count(), 0);
    assert!(harness.creative.prompts()[0].contains("An animated warehouse\n\nAdjustments requested: warmer colours"));
}

#[tokio::test]
async fn test_regenerated_chart_uses_user_data() {
    let harness = Harness::new();

    let graphic = harness
        .router()
        .regenerate_with_feedback(
            "Bar chart of forecast accuracy by quarter",
            "larger labels",
            GraphicKind::Chart,
            Some(r#"{"dataPoints": "Q1: 100, Q2: 120"}"#),
            &research(),
        )
        .await
        .into_result()
        .unwrap();
    assert_eq!(graphic.backend, "chart-svg");
    assert!(!graphic.illustrative);
    assert!(!svg_text(&graphic.data_uri).contains(ILLUSTRATIVE_CAPTION));

    let prompt = harness.llm.last_prompt().unwrap();
    assert!(prompt.contains("IMPORTANT - USE THESE EXACT DATA POINTS (user-provided):\nQ1: 100, Q2: 120"));
    assert!(prompt.contains("Adjustments requested: larger labels"));
}

#[tokio::test]
async fn test_variations() {
    let harness = Harness::new();
    let router = harness.router();

    let variations = router
        .generate_variations("A warehouse at dawn", GraphicKind::Conceptual, None, &[])
        .await
        .unwrap();
    assert_eq!(variations.len(), 3);
    let prompts = harness.creative.prompts();
    assert!(prompts[0].contains("Variation 1:"));
    assert!(prompts[2].contains("Variation 3:"));

    assert_eq!(
        router.generate_variations("clip", GraphicKind::Video, None, &[]).await,
        Err(FailureReason::VariationsUnsupported(GraphicKind::Video))
    );
}

#[tokio::test]
async fn test_variations_all_failing_is_absence() {
    let mut harness = Harness::new();
    harness.creative = MockImageGenerator::failing("creative", ProviderError::Other("down".into()));

    let result = harness
        .router()
        .generate_variations("A warehouse at dawn", GraphicKind::Conceptual, None, &[])
        .await;
    assert_eq!(result, Err(FailureReason::NoVariations));
    assert_eq!(harness.creative.call_count(), 3);
}
