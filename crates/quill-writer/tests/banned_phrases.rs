//! Banned-phrase regeneration against a scripted model

use quill_domain::{Fact, FactType, ProviderError, ResearchResult};
use quill_llm::MockProvider;
use quill_writer::{WriterConfig, WriterError, WritingComposer};
use std::sync::Arc;

fn composer(llm: &MockProvider) -> WritingComposer {
    WritingComposer::new(Arc::new(llm.clone()), WriterConfig::default()).unwrap()
}

#[tokio::test]
async fn test_banned_phrase_triggers_exactly_one_regeneration() {
    let llm = MockProvider::new("Fallback text");
    llm.push_response("Let's dive into why forecasts fail.");
    llm.push_response("Forecasts fail because nobody owns them.");

    let post = composer(&llm)
        .draft_post("Forecast ownership", "Dana", &[], &[])
        .await
        .unwrap();

    assert_eq!(post.text, "Forecasts fail because nobody owns them.");
    assert_eq!(post.regenerated_for.as_deref(), Some("let's dive into"));
    assert_eq!(llm.call_count(), 2);

    let calls = llm.calls();
    assert!(calls[1]
        .prompt
        .starts_with("The previous draft contained the banned phrase \"let's dive into\"."));
    assert_eq!(calls[1].options.temperature, Some(0.8));
}

#[tokio::test]
async fn test_regeneration_is_returned_unconditionally() {
    let llm = MockProvider::new("unused");
    llm.push_response("This is a game-changer.");
    llm.push_response("Still a game-changer, honestly. At the end of the day.");

    let post = composer(&llm).draft_post("idea", "Dana", &[], &[]).await.unwrap();
    assert_eq!(post.text, "Still a game-changer, honestly. At the end of the day.");
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn test_research_reaches_the_prompt() {
    let llm = MockProvider::new("Only 23% of retailers trust their forecasts, says Gartner.");
    let research = vec![ResearchResult {
        url: "https://www.gartner.com/a".into(),
        source_name: "gartner.com".into(),
        extracted_facts: vec![Fact {
            fact: "Only 23% of retailers trust their forecasts".into(),
            fact_type: FactType::Statistic,
            citation_text: "Gartner's 2024 survey found".into(),
        }],
        summary: "Forecast trust is low.".into(),
        relevance_score: 9,
        error: None,
    }];

    composer(&llm).draft_post("idea", "Dana", &research, &[]).await.unwrap();
    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("Citation: Gartner's 2024 survey found"));
    assert!(prompt.contains("CITATION REQUIREMENTS"));
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let llm = MockProvider::new("unused");
    llm.push_error(ProviderError::RateLimitExceeded);

    let result = composer(&llm).draft_post("idea", "Dana", &[], &[]).await;
    assert_eq!(result, Err(WriterError::Llm(ProviderError::RateLimitExceeded)));
}
