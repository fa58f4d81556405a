//! Research results extracted from web pages

use serde::{Deserialize, Serialize};

/// Summary used when a URL could not be fetched at all
pub const FETCH_FAILED_SUMMARY: &str = "Failed to fetch content from URL";

/// Kind of fact pulled out of a research source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactType {
    /// A number or measured data point
    Statistic,
    /// A citable quotation
    Quote,
    /// A conclusion or result
    Finding,
    /// A direction of change over time
    Trend,
}

impl FactType {
    /// Parse a model-reported type, treating anything unrecognised as a finding
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "statistic" | "stat" | "statistics" => FactType::Statistic,
            "quote" => FactType::Quote,
            "trend" => FactType::Trend,
            _ => FactType::Finding,
        }
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FactType::Statistic => "statistic",
            FactType::Quote => "quote",
            FactType::Finding => "finding",
            FactType::Trend => "trend",
        }
    }

    /// Whether the fact carries numbers a chart could plot
    pub fn is_chartable(&self) -> bool {
        !matches!(self, FactType::Quote)
    }
}

/// One fact extracted from a research source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// The fact or statistic itself
    pub fact: String,

    /// Kind of fact
    #[serde(rename = "type")]
    pub fact_type: FactType,

    /// Suggested attribution wording
    #[serde(default)]
    pub citation_text: String,
}

/// Facts and summary extracted from a single research URL
///
/// Produced once per URL and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    /// Source URL as submitted
    pub url: String,

    /// Host of the URL with any leading `www.` removed
    pub source_name: String,

    /// Facts relevant to the topic
    #[serde(default)]
    pub extracted_facts: Vec<Fact>,

    /// Short summary of the relevant content
    #[serde(default)]
    pub summary: String,

    /// Relevance to the topic, 0 (failure) or 1-10
    #[serde(default)]
    pub relevance_score: u8,

    /// Set when the page could not be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl ResearchResult {
    /// Result recorded when every fetch attempt failed
    pub fn fetch_failed(url: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source_name: source_name.into(),
            extracted_facts: Vec::new(),
            summary: FETCH_FAILED_SUMMARY.to_string(),
            relevance_score: 0,
            error: Some(true),
        }
    }

    /// Whether this result marks a failed fetch
    pub fn is_error(&self) -> bool {
        self.error.unwrap_or(false)
    }

    /// Facts suitable for chart and infographic prompts
    pub fn chartable_facts(&self) -> impl Iterator<Item = &Fact> {
        self.extracted_facts
            .iter()
            .filter(|f| f.fact_type.is_chartable() && !f.fact.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_type_lenient_parse() {
        assert_eq!(FactType::parse_lenient("Statistic"), FactType::Statistic);
        assert_eq!(FactType::parse_lenient(" quote "), FactType::Quote);
        assert_eq!(FactType::parse_lenient("trend"), FactType::Trend);
        assert_eq!(FactType::parse_lenient("opinion"), FactType::Finding);
    }

    #[test]
    fn test_fetch_failed_shape() {
        let result = ResearchResult::fetch_failed("http://x", "x");
        assert_eq!(result.summary, "Failed to fetch content from URL");
        assert_eq!(result.relevance_score, 0);
        assert!(result.extracted_facts.is_empty());
        assert!(result.is_error());
    }

    #[test]
    fn test_error_flag_omitted_when_absent() {
        let result = ResearchResult {
            url: "https://example.com".into(),
            source_name: "example.com".into(),
            extracted_facts: vec![],
            summary: "s".into(),
            relevance_score: 7,
            error: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["relevance_score"], 7);
    }

    #[test]
    fn test_chartable_facts_skip_quotes() {
        let result = ResearchResult {
            url: "u".into(),
            source_name: "s".into(),
            extracted_facts: vec![
                Fact { fact: "Sales up 12%".into(), fact_type: FactType::Statistic, citation_text: String::new() },
                Fact { fact: "\"We grew\"".into(), fact_type: FactType::Quote, citation_text: String::new() },
                Fact { fact: "  ".into(), fact_type: FactType::Trend, citation_text: String::new() },
            ],
            summary: String::new(),
            relevance_score: 5,
            error: None,
        };
        let facts: Vec<_> = result.chartable_facts().collect();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].fact, "Sales up 12%");
    }

    #[test]
    fn test_fact_serializes_type_field() {
        let fact = Fact { fact: "x".into(), fact_type: FactType::Trend, citation_text: "c".into() };
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(json["type"], "trend");
    }
}
