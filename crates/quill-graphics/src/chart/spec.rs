//! Declarative chart specification returned by the language model

use crate::error::GraphicsError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Most points a bar, line or pie chart may carry
pub const MAX_POINTS: usize = 12;

/// Most boxes a flow diagram may carry
pub const MAX_STEPS: usize = 8;

/// Largest magnitude a plotted value may have
pub const MAX_ABS_VALUE: f64 = 1e15;

/// Chart layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Vertical bars
    Bar,
    /// Connected points
    Line,
    /// Slices of a whole
    Pie,
    /// Boxes joined by arrows, left to right
    Flow,
}

/// One labelled value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Category or period label
    pub label: String,
    /// Plotted value
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub value: f64,
}

/// Chart the renderer knows how to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Layout
    #[serde(rename = "type")]
    pub chart_type: ChartType,

    /// Bold heading
    #[serde(default)]
    pub title: String,

    /// Horizontal axis label
    #[serde(default)]
    pub x_label: String,

    /// Vertical axis label
    #[serde(default)]
    pub y_label: String,

    /// Values for bar, line and pie charts
    #[serde(default)]
    pub points: Vec<DataPoint>,

    /// Box labels for flow diagrams
    #[serde(default)]
    pub steps: Vec<String>,

    /// Footnote naming the data source
    #[serde(default)]
    pub source_note: Option<String>,
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .replace(',', "")
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    parsed.ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {}", value)))
}

impl ChartSpec {
    /// Parse a model response: fenced or raw JSON, then validate
    pub fn parse(response: &str) -> Result<Self, GraphicsError> {
        let json = locate_object(response)
            .ok_or_else(|| GraphicsError::InvalidChartSpec("no JSON object in response".to_string()))?;
        let spec: ChartSpec =
            serde_json::from_str(json).map_err(|e| GraphicsError::InvalidChartSpec(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check that the spec is drawable
    pub fn validate(&self) -> Result<(), GraphicsError> {
        let invalid = |msg: &str| Err(GraphicsError::InvalidChartSpec(msg.to_string()));

        match self.chart_type {
            ChartType::Flow => {
                if self.steps.len() < 2 || self.steps.len() > MAX_STEPS {
                    return invalid("flow diagrams need 2 to 8 steps");
                }
                if self.steps.iter().any(|s| s.trim().is_empty()) {
                    return invalid("flow step labels must not be empty");
                }
            }
            ChartType::Bar | ChartType::Line | ChartType::Pie => {
                if self.points.is_empty() || self.points.len() > MAX_POINTS {
                    return invalid("charts need 1 to 12 points");
                }
                if self.points.iter().any(|p| !p.value.is_finite()) {
                    return invalid("point values must be finite");
                }
                if self.points.iter().any(|p| p.value.abs() > MAX_ABS_VALUE) {
                    return invalid("point values must be within ±1e15");
                }
                if self.chart_type == ChartType::Pie {
                    if self.points.iter().any(|p| p.value < 0.0) {
                        return invalid("pie values must not be negative");
                    }
                    if self.points.iter().map(|p| p.value).sum::<f64>() <= 0.0 {
                        return invalid("pie values must sum to more than zero");
                    }
                }
            }
        }
        Ok(())
    }
}

/// Slice from the first `{` to the last `}` after stripping code fences
fn locate_object(response: &str) -> Option<&str> {
    let body = match response.split_once("```") {
        Some((_, rest)) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.split("```").next().unwrap_or(rest)
        }
        None => response,
    };
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (end > start).then(|| &body[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_bar_spec() {
        let response = r#"Sure:
```json
{"type": "bar", "title": "Forecast accuracy", "y_label": "%",
 "points": [{"label": "Q1", "value": 100}, {"label": "Q2", "value": "120"}]}
```"#;
        let spec = ChartSpec::parse(response).unwrap();
        assert_eq!(spec.chart_type, ChartType::Bar);
        assert_eq!(spec.points.len(), 2);
        assert_eq!(spec.points[1].value, 120.0);
        assert_eq!(spec.source_note, None);
    }

    #[test]
    fn test_parse_flow_spec() {
        let spec = ChartSpec::parse(r#"{"type": "flow", "title": "Returns", "steps": ["Receive", "Inspect", "Restock"]}"#)
            .unwrap();
        assert_eq!(spec.chart_type, ChartType::Flow);
        assert_eq!(spec.steps.len(), 3);
    }

    #[test]
    fn test_numeric_strings() {
        let spec = ChartSpec::parse(r#"{"type": "pie", "points": [{"label": "A", "value": "1,200"}, {"label": "B", "value": "35%"}]}"#)
            .unwrap();
        assert_eq!(spec.points[0].value, 1200.0);
        assert_eq!(spec.points[1].value, 35.0);
    }

    #[test]
    fn test_rejects_unusable_specs() {
        assert!(ChartSpec::parse("import matplotlib.pyplot as plt").is_err());
        assert!(ChartSpec::parse(r#"{"type": "radar", "points": []}"#).is_err());
        assert!(ChartSpec::parse(r#"{"type": "bar", "points": []}"#).is_err());
        assert!(ChartSpec::parse(r#"{"type": "flow", "steps": ["only one"]}"#).is_err());
        assert!(ChartSpec::parse(r#"{"type": "pie", "points": [{"label": "A", "value": -1}]}"#).is_err());
        assert!(ChartSpec::parse(r#"{"type": "line", "points": [{"label": "A", "value": "n/a"}]}"#).is_err());
    }

    #[test]
    fn test_rejects_values_beyond_plot_range() {
        let extreme = r#"{"type": "bar", "points": [{"label": "a", "value": 1.7e308}, {"label": "b", "value": -1.7e308}]}"#;
        assert!(matches!(ChartSpec::parse(extreme), Err(GraphicsError::InvalidChartSpec(_))));

        let edge = r#"{"type": "line", "points": [{"label": "a", "value": 1e15}, {"label": "b", "value": -1e15}]}"#;
        assert!(ChartSpec::parse(edge).is_ok());
    }
}
