//! Graphic Classifier
//!
//! Maps a free-text description to a [`GraphicKind`] with an ordered rule
//! table: the first rule with a keyword contained in the lowercased
//! description wins, and anything unmatched is conceptual. Rule order is the
//! precedence (video over infographic over chart over diagram), so
//! "infographic video" is a video.

use quill_domain::GraphicKind;

/// Version of [`CLASSIFICATION_RULES`]; bump when keywords or order change
pub const RULES_VERSION: u32 = 1;

/// One classification rule
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    /// Kind assigned when a keyword matches
    pub kind: GraphicKind,
    /// Lowercase substrings that trigger the rule
    pub keywords: &'static [&'static str],
}

/// Ordered rule table; earlier rules take precedence
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        kind: GraphicKind::Video,
        keywords: &[
            "video", "animation", "animated", "motion graphics",
            "moving", "clip", "footage", "movie",
        ],
    },
    ClassificationRule {
        kind: GraphicKind::Infographic,
        keywords: &[
            "infographic", "stats", "statistics visualization",
            "data visualization with text", "text-heavy", "diagram with text",
            "comparison chart with labels", "data summary", "key metrics",
            "stat card", "data card", "metrics dashboard",
        ],
    },
    ClassificationRule {
        kind: GraphicKind::Chart,
        keywords: &[
            "bar chart", "line chart", "pie chart", "area chart",
            "histogram", "scatter plot", "scatter chart",
            "column chart", "stacked chart", "donut chart",
            "bar graph", "line graph", "pie graph",
            "data visualization chart", "chart showing data",
            "graph of", "chart of",
        ],
    },
    ClassificationRule {
        kind: GraphicKind::Diagram,
        keywords: &[
            "venn diagram", "flowchart", "flow chart", "flow diagram",
            "process diagram", "org chart", "organization chart",
            "architecture diagram", "network diagram", "system diagram",
            "sequence diagram", "state diagram", "er diagram",
            "uml diagram", "block diagram",
        ],
    },
];

/// Kind used when no rule matches
pub const DEFAULT_KIND: GraphicKind = GraphicKind::Conceptual;

/// Classification plus the keyword that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Resolved kind
    pub kind: GraphicKind,
    /// Matching keyword, `None` for the default
    pub keyword: Option<&'static str>,
}

/// Classify a description, reporting the deciding keyword
pub fn classify_with_reason(description: &str) -> Classification {
    let lowered = description.to_lowercase();
    for rule in CLASSIFICATION_RULES {
        if let Some(keyword) = rule.keywords.iter().find(|k| lowered.contains(*k)) {
            return Classification {
                kind: rule.kind,
                keyword: Some(keyword),
            };
        }
    }
    Classification {
        kind: DEFAULT_KIND,
        keyword: None,
    }
}

/// Classify a description into one graphic kind
pub fn classify(description: &str) -> GraphicKind {
    classify_with_reason(description).kind
}
