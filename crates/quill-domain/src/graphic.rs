//! Graphic requests and the concrete kinds they resolve to

use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete graphic category driving backend dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicKind {
    /// Short generated video clip
    Video,
    /// Text-heavy image with data callouts
    Infographic,
    /// Data chart
    Chart,
    /// Flow, process or structure diagram
    Diagram,
    /// Creative illustration or rendering
    Conceptual,
}

impl GraphicKind {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphicKind::Video => "video",
            GraphicKind::Infographic => "infographic",
            GraphicKind::Chart => "chart",
            GraphicKind::Diagram => "diagram",
            GraphicKind::Conceptual => "conceptual",
        }
    }

    /// Parse a wire name; `concept` is accepted as an alias of `conceptual`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "video" => Some(GraphicKind::Video),
            "infographic" => Some(GraphicKind::Infographic),
            "chart" => Some(GraphicKind::Chart),
            "diagram" => Some(GraphicKind::Diagram),
            "conceptual" | "concept" => Some(GraphicKind::Conceptual),
            _ => None,
        }
    }

    /// Whether research facts may be handed to this kind's backend
    pub fn accepts_research(&self) -> bool {
        matches!(self, GraphicKind::Infographic | GraphicKind::Chart | GraphicKind::Diagram)
    }
}

impl fmt::Display for GraphicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller asked for before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedType {
    /// Empty, `auto` or `none`: let the classifier decide
    Auto,
    /// A recognised explicit kind
    Explicit(GraphicKind),
    /// An explicit value nobody recognises; routed to the creative backend
    Unrecognized(String),
}

impl RequestedType {
    /// Interpret an optional raw type string from a request
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return RequestedType::Auto;
        };
        let lowered = value.to_ascii_lowercase();
        if lowered == "auto" || lowered == "none" {
            return RequestedType::Auto;
        }
        match GraphicKind::parse(&lowered) {
            Some(kind) => RequestedType::Explicit(kind),
            None => RequestedType::Unrecognized(value.to_string()),
        }
    }
}

/// A request to generate one graphic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphicRequest {
    /// Free-text description of the graphic
    pub description: String,

    /// Optional explicit type (`chart`, `diagram`, `conceptual`, `infographic`, `video`, `auto`)
    #[serde(default)]
    pub requested_type: Option<String>,

    /// Optional JSON string with `dataPoints`, `startValue`, `endValue`, `timePeriod`
    #[serde(default)]
    pub chart_data: Option<String>,
}

impl GraphicRequest {
    /// Request with only a description; the classifier picks the type
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            requested_type: None,
            chart_data: None,
        }
    }

    /// Set the explicit requested type
    pub fn with_type(mut self, requested_type: impl Into<String>) -> Self {
        self.requested_type = Some(requested_type.into());
        self
    }

    /// Attach chart data
    pub fn with_chart_data(mut self, chart_data: impl Into<String>) -> Self {
        self.chart_data = Some(chart_data.into());
        self
    }

    /// Parsed form of `requested_type`
    pub fn requested(&self) -> RequestedType {
        RequestedType::from_raw(self.requested_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_variants() {
        assert_eq!(RequestedType::from_raw(None), RequestedType::Auto);
        assert_eq!(RequestedType::from_raw(Some("")), RequestedType::Auto);
        assert_eq!(RequestedType::from_raw(Some("  ")), RequestedType::Auto);
        assert_eq!(RequestedType::from_raw(Some("auto")), RequestedType::Auto);
        assert_eq!(RequestedType::from_raw(Some("None")), RequestedType::Auto);
    }

    #[test]
    fn test_explicit_and_alias() {
        assert_eq!(
            RequestedType::from_raw(Some("chart")),
            RequestedType::Explicit(GraphicKind::Chart)
        );
        assert_eq!(
            RequestedType::from_raw(Some("concept")),
            RequestedType::Explicit(GraphicKind::Conceptual)
        );
    }

    #[test]
    fn test_unrecognized_is_preserved() {
        assert_eq!(
            RequestedType::from_raw(Some("hologram")),
            RequestedType::Unrecognized("hologram".to_string())
        );
    }

    #[test]
    fn test_research_acceptance() {
        assert!(GraphicKind::Chart.accepts_research());
        assert!(GraphicKind::Diagram.accepts_research());
        assert!(GraphicKind::Infographic.accepts_research());
        assert!(!GraphicKind::Conceptual.accepts_research());
        assert!(!GraphicKind::Video.accepts_research());
    }
}
