//! Submissions awaiting human review

use crate::{DataSource, ResearchResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a submission based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, which matches the
/// newest-first review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u128);

impl SubmissionId {
    /// Generate a new UUIDv7-based SubmissionId
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_domain::SubmissionId;
    ///
    /// let id = SubmissionId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a SubmissionId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a SubmissionId from its hyphenated UUID form
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_domain::SubmissionId;
    ///
    /// let id = SubmissionId::new();
    /// let parsed = SubmissionId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid submission id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for SubmissionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SubmissionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SubmissionId::from_string(&raw).map_err(serde::de::Error::custom)
    }
}

/// Review state of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Waiting for a reviewer
    PendingReview,
    /// Accepted, possibly with edits
    Approved,
    /// Declined
    Rejected,
}

impl SubmissionStatus {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::PendingReview => "pending_review",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    /// Parse a wire name
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending_review" => Some(SubmissionStatus::PendingReview),
            "approved" => Some(SubmissionStatus::Approved),
            "rejected" => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }
}

/// A reviewable content submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier
    pub id: SubmissionId,
    /// Author display name
    pub author: String,
    /// The raw idea as typed (empty for graphic-only submissions)
    pub raw_input: String,
    /// Generated post text, replaced by the reviewer's edit on approval
    pub ai_draft: Option<String>,
    /// Description the graphic was generated from
    pub graphic_description: Option<String>,
    /// Resolved graphic type used for generation
    pub graphic_type: Option<String>,
    /// Graphic as a data URI
    pub graphic_data: Option<String>,
    /// Author-supplied chart values, reused on regeneration
    pub chart_data: Option<String>,
    /// Author-declared data sources
    pub data_sources: Option<Vec<DataSource>>,
    /// Research extracted from the submitted URLs
    pub research_results: Option<Vec<ResearchResult>>,
    /// Review state
    pub status: SubmissionStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of approval or rejection
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reviewer's reason for rejecting
    pub rejection_reason: Option<String>,
}

/// Fields supplied when creating a submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSubmission {
    /// Author display name
    pub author: String,
    /// The raw idea
    pub raw_input: String,
    /// Generated post text
    pub ai_draft: Option<String>,
    /// Graphic description
    pub graphic_description: Option<String>,
    /// Resolved graphic type
    pub graphic_type: Option<String>,
    /// Graphic data URI
    pub graphic_data: Option<String>,
    /// Author-supplied chart values
    pub chart_data: Option<String>,
    /// Declared data sources
    pub data_sources: Option<Vec<DataSource>>,
    /// Research results
    pub research_results: Option<Vec<ResearchResult>>,
}

/// Partial update applied by review operations; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPatch {
    /// New review state
    pub status: Option<SubmissionStatus>,
    /// Replacement post text
    pub ai_draft: Option<String>,
    /// Replacement graphic
    pub graphic_data: Option<String>,
    /// Review timestamp
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Rejection reason
    pub rejection_reason: Option<String>,
}

impl SubmissionPatch {
    /// Approve with the reviewer's edited post
    pub fn approve(edited_post: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(SubmissionStatus::Approved),
            ai_draft: Some(edited_post.into()),
            reviewed_at: Some(at),
            ..Self::default()
        }
    }

    /// Reject, optionally recording why
    pub fn reject(reason: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(SubmissionStatus::Rejected),
            reviewed_at: Some(at),
            rejection_reason: reason,
            ..Self::default()
        }
    }

    /// Replace the graphic
    pub fn graphic(graphic_data: impl Into<String>) -> Self {
        Self {
            graphic_data: Some(graphic_data.into()),
            ..Self::default()
        }
    }

    /// Apply the patch to a submission in place
    pub fn apply_to(self, submission: &mut Submission) {
        if let Some(status) = self.status {
            submission.status = status;
        }
        if let Some(draft) = self.ai_draft {
            submission.ai_draft = Some(draft);
        }
        if let Some(graphic) = self.graphic_data {
            submission.graphic_data = Some(graphic);
        }
        if let Some(at) = self.reviewed_at {
            submission.reviewed_at = Some(at);
        }
        if let Some(reason) = self.rejection_reason {
            submission.rejection_reason = Some(reason);
        }
    }
}
