//! Tolerant parsing of the fact-extraction response
//!
//! The model is asked for JSON but may wrap it in code fences or answer in
//! prose. Unparseable output degrades to an empty fact list with the raw
//! text as summary and a neutral relevance score.

use quill_domain::{Fact, FactType};
use serde_json::Value;
use tracing::warn;

/// Relevance assigned when the response could not be parsed
pub const UNPARSED_RELEVANCE: u8 = 5;

/// Characters of raw response kept as summary on parse failure
pub const UNPARSED_SUMMARY_CHARS: usize = 500;

/// Facts, summary and score read from a model response
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFacts {
    /// Extracted facts
    pub facts: Vec<Fact>,
    /// Summary text
    pub summary: String,
    /// Relevance clamped to 0..=10
    pub relevance_score: u8,
}

/// Parse a model response, degrading instead of failing
pub fn parse_fact_response(response: &str) -> ParsedFacts {
    match try_parse(response) {
        Ok(parsed) => parsed,
        Err(reason) => {
            warn!("Failed to parse JSON response ({}), using raw text", reason);
            ParsedFacts {
                facts: Vec::new(),
                summary: response.chars().take(UNPARSED_SUMMARY_CHARS).collect(),
                relevance_score: UNPARSED_RELEVANCE,
            }
        }
    }
}

fn try_parse(response: &str) -> Result<ParsedFacts, String> {
    let json: Value = serde_json::from_str(extract_json(response)).map_err(|e| e.to_string())?;
    let obj = json.as_object().ok_or_else(|| "Expected JSON object".to_string())?;

    let facts = obj
        .get("extracted_facts")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| match parse_fact(item) {
                    Ok(fact) => Some(fact),
                    Err(e) => {
                        warn!("Skipping fact {}: {}", idx, e);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let relevance_score = obj
        .get("relevance_score")
        .and_then(parse_score)
        .unwrap_or(UNPARSED_RELEVANCE);

    Ok(ParsedFacts {
        facts,
        summary,
        relevance_score,
    })
}

/// Locate JSON in ```json fences, bare ``` fences, or the raw text
fn extract_json(response: &str) -> &str {
    if let Some((_, rest)) = response.split_once("```json") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    if let Some((_, rest)) = response.split_once("```") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    response.trim()
}

fn parse_fact(json: &Value) -> Result<Fact, String> {
    let obj = json.as_object().ok_or_else(|| "Fact is not a JSON object".to_string())?;

    let fact = obj
        .get("fact")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| "Missing or invalid 'fact'".to_string())?
        .to_string();

    let fact_type = obj
        .get("type")
        .and_then(Value::as_str)
        .map(FactType::parse_lenient)
        .unwrap_or(FactType::Finding);

    let citation_text = obj
        .get("citation_text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Fact {
        fact,
        fact_type,
        citation_text,
    })
}

fn parse_score(value: &Value) -> Option<u8> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(score.round().clamp(0.0, 10.0) as u8)
}
