//! User-declared data sources used to annotate writing prompts

use serde::{Deserialize, Serialize};

/// Where a declared data point comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// The author's own experience
    Personal,
    /// Confidential client data
    Client,
    /// Published industry report
    IndustryReport,
    /// Found on the web
    WebSource,
    /// Made-up example numbers
    Illustrative,
}

impl SourceType {
    /// Human-readable label placed in prompts
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::Personal => "Personal knowledge/experience",
            SourceType::Client => "Client data (confidential)",
            SourceType::IndustryReport => "Industry report",
            SourceType::WebSource => "Web source",
            SourceType::Illustrative => "Illustrative/example data (NOT real)",
        }
    }
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::Personal
    }
}

/// A data point the author declared alongside their idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    /// What is being measured
    pub data_point: String,

    /// The value as the author wrote it
    pub value: String,

    /// Provenance of the value
    #[serde(default)]
    pub source_type: SourceType,

    /// Free-text provenance detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_description: Option<String>,
}

impl DataSource {
    /// Whether this value must not be presented as fact
    pub fn is_illustrative(&self) -> bool {
        self.source_type == SourceType::Illustrative
    }
}
