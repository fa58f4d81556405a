//! Data handed to the chart backend and where it came from

use crate::prompts::research_fact_lines;
use quill_domain::ResearchResult;
use serde_json::Value;
use tracing::{debug, warn};

/// Origin of the numbers a chart will plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataProvenance {
    /// Values typed in by the author; wins over research
    UserSupplied,
    /// Statistics extracted from research sources
    Research,
    /// No real data: the model invents example values and the chart is captioned
    Illustrative,
}

impl DataProvenance {
    /// Whether the rendered chart must carry the illustrative disclaimer
    pub fn is_illustrative(&self) -> bool {
        matches!(self, DataProvenance::Illustrative)
    }
}

/// Author-supplied chart values from a `chart_data` JSON string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    /// Free-text data points, e.g. `Q1: 100, Q2: 120`
    pub data_points: Option<String>,
    /// Starting value
    pub start_value: Option<String>,
    /// Ending value
    pub end_value: Option<String>,
    /// Period between start and end
    pub time_period: Option<String>,
}

fn text_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    let text = match obj.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

impl ChartData {
    /// Parse `chart_data`; malformed JSON is logged and ignored
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse chart_data: {}", e);
                return None;
            }
        };
        let Some(obj) = value.as_object() else {
            warn!("Failed to parse chart_data: expected a JSON object");
            return None;
        };

        Some(Self {
            data_points: text_field(obj, "dataPoints"),
            start_value: text_field(obj, "startValue"),
            end_value: text_field(obj, "endValue"),
            time_period: text_field(obj, "timePeriod"),
        })
    }

    /// Prompt block for these values, if they amount to real data
    ///
    /// Free-text data points take priority; otherwise both a start and an
    /// end value are required.
    pub fn instruction(&self) -> Option<String> {
        if let Some(points) = &self.data_points {
            return Some(format!(
                "IMPORTANT - USE THESE EXACT DATA POINTS (user-provided):\n{}",
                points
            ));
        }
        let (Some(start), Some(end)) = (&self.start_value, &self.end_value) else {
            return None;
        };
        let mut block = format!(
            "IMPORTANT - USE THESE EXACT VALUES (user-provided):\n- Start value: {}\n- End value: {}",
            start, end
        );
        if let Some(period) = &self.time_period {
            block.push_str(&format!("\n- Time period: {}", period));
        }
        Some(block)
    }
}

/// Data instruction and provenance for one chart request
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInputs {
    /// Prompt block describing the data, absent when illustrative
    pub data_instruction: Option<String>,
    /// Where the data came from
    pub provenance: DataProvenance,
    /// Research sources used, for the footnote
    pub sources: Vec<String>,
}

impl ChartInputs {
    /// Combine author data and research; author data wins when both exist
    pub fn gather(chart_data: Option<&str>, research: &[ResearchResult]) -> Self {
        if let Some(instruction) = chart_data.and_then(ChartData::parse).and_then(|d| d.instruction()) {
            debug!("Using user-provided chart data");
            return Self {
                data_instruction: Some(instruction),
                provenance: DataProvenance::UserSupplied,
                sources: Vec::new(),
            };
        }

        let facts = research_fact_lines(research);
        if !facts.is_empty() {
            debug!("Using research data with {} facts", facts.len());
            let mut sources: Vec<String> = research
                .iter()
                .filter(|r| !r.is_error() && r.chartable_facts().next().is_some())
                .map(|r| r.source_name.clone())
                .collect();
            sources.dedup();
            return Self {
                data_instruction: Some(format!(
                    "IMPORTANT - USE REAL DATA FROM RESEARCH SOURCES:\n\
                     The following statistics were extracted from research URLs. Use these EXACT values in your chart:\n\
                     {}\n\n\
                     Extract the relevant numbers from these facts and use them as your data points. \
                     Name the source in \"source_note\".",
                    facts.join("\n")
                )),
                provenance: DataProvenance::Research,
                sources,
            };
        }

        debug!("No real data - chart will carry the illustrative disclaimer");
        Self {
            data_instruction: None,
            provenance: DataProvenance::Illustrative,
            sources: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_domain::{Fact, FactType};

    fn research_with_stat() -> Vec<ResearchResult> {
        vec![ResearchResult {
            url: "https://gartner.com/x".to_string(),
            source_name: "gartner.com".to_string(),
            extracted_facts: vec![Fact {
                fact: "Forecast error fell 30%".to_string(),
                fact_type: FactType::Statistic,
                citation_text: String::new(),
            }],
            summary: String::new(),
            relevance_score: 7,
            error: None,
        }]
    }

    #[test]
    fn test_data_points_take_priority() {
        let data = ChartData::parse(r#"{"dataPoints": "Q1: 100, Q2: 120", "startValue": "1", "endValue": "2"}"#).unwrap();
        assert_eq!(
            data.instruction().unwrap(),
            "IMPORTANT - USE THESE EXACT DATA POINTS (user-provided):\nQ1: 100, Q2: 120"
        );
    }

    #[test]
    fn test_start_end_values() {
        let data = ChartData::parse(r#"{"startValue": 100, "endValue": "150", "timePeriod": "6 months", "dataPoints": "  "}"#)
            .unwrap();
        let instruction = data.instruction().unwrap();
        assert!(instruction.contains("- Start value: 100\n- End value: 150\n- Time period: 6 months"));

        let half = ChartData::parse(r#"{"startValue": "100"}"#).unwrap();
        assert_eq!(half.instruction(), None);
    }

    #[test]
    fn test_malformed_chart_data_is_ignored() {
        assert_eq!(ChartData::parse("{not json"), None);
        assert_eq!(ChartData::parse("[1, 2]"), None);
        assert_eq!(ChartData::parse(""), None);
    }

    #[test]
    fn test_provenance() {
        let user = ChartInputs::gather(Some(r#"{"dataPoints": "Q1: 100, Q2: 120"}"#), &research_with_stat());
        assert_eq!(user.provenance, DataProvenance::UserSupplied);

        let research = ChartInputs::gather(None, &research_with_stat());
        assert_eq!(research.provenance, DataProvenance::Research);
        assert_eq!(research.sources, vec!["gartner.com".to_string()]);
        assert!(research
            .data_instruction
            .unwrap()
            .contains("- Forecast error fell 30% (Source: gartner.com)"));

        let none = ChartInputs::gather(Some("{}"), &[]);
        assert_eq!(none.provenance, DataProvenance::Illustrative);
        assert!(none.provenance.is_illustrative());
        assert_eq!(none.data_instruction, None);
    }
}
