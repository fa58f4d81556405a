//! Quill Storage Layer
//!
//! Implements the SubmissionStore trait on SQLite.
//!
//! # Architecture
//!
//! - One `submissions` table; identifiers are UUIDv7 strings
//! - Data sources and research results are stored as JSON text
//! - Timestamps are RFC 3339 UTC strings with fixed precision, so text
//!   order is time order
//!
//! # Examples
//!
//! ```no_run
//! use quill_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for submission operations
//! ```

#![warn(missing_docs)]

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use quill_domain::{
    NewSubmission, Submission, SubmissionId, SubmissionPatch, SubmissionStatus, SubmissionStore,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const COLUMNS: &str = "id, author, raw_input, ai_draft, graphic_description, graphic_type, graphic_data, \
                       data_sources, research_results, status, created_at, reviewed_at, rejection_reason, chart_data";

/// SQLite-based implementation of SubmissionStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store across tasks behind
/// a mutex, or give each thread its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

/// Raw column values of one row
struct SubmissionRow {
    id: String,
    author: String,
    raw_input: String,
    ai_draft: Option<String>,
    graphic_description: Option<String>,
    graphic_type: Option<String>,
    graphic_data: Option<String>,
    data_sources: Option<String>,
    research_results: Option<String>,
    status: String,
    created_at: String,
    reviewed_at: Option<String>,
    rejection_reason: Option<String>,
    chart_data: Option<String>,
}

impl SubmissionRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            author: row.get(1)?,
            raw_input: row.get(2)?,
            ai_draft: row.get(3)?,
            graphic_description: row.get(4)?,
            graphic_type: row.get(5)?,
            graphic_data: row.get(6)?,
            data_sources: row.get(7)?,
            research_results: row.get(8)?,
            status: row.get(9)?,
            created_at: row.get(10)?,
            reviewed_at: row.get(11)?,
            rejection_reason: row.get(12)?,
            chart_data: row.get(13)?,
        })
    }

    fn into_submission(self) -> Result<Submission, StoreError> {
        let id = SubmissionId::from_string(&self.id).map_err(StoreError::InvalidData)?;
        let status = SubmissionStatus::parse(&self.status)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown status: {}", self.status)))?;

        Ok(Submission {
            id,
            author: self.author,
            raw_input: self.raw_input,
            ai_draft: self.ai_draft,
            graphic_description: self.graphic_description,
            graphic_type: self.graphic_type,
            graphic_data: self.graphic_data,
            chart_data: self.chart_data,
            data_sources: self.data_sources.as_deref().map(serde_json::from_str).transpose()?,
            research_results: self.research_results.as_deref().map(serde_json::from_str).transpose()?,
            status,
            created_at: parse_timestamp(&self.created_at)?,
            reviewed_at: self.reviewed_at.as_deref().map(parse_timestamp).transpose()?,
            rejection_reason: self.rejection_reason,
        })
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("Invalid timestamp '{}': {}", raw, e)))
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quill_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("quill.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Number of stored submissions in any state
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|e| StoreError::InvalidData(e.to_string()))
    }
}

impl SubmissionStore for SqliteStore {
    type Error = StoreError;

    fn create_submission(&mut self, submission: NewSubmission) -> Result<Submission, Self::Error> {
        let record = Submission {
            id: SubmissionId::new(),
            author: submission.author,
            raw_input: submission.raw_input,
            ai_draft: submission.ai_draft,
            graphic_description: submission.graphic_description,
            graphic_type: submission.graphic_type,
            graphic_data: submission.graphic_data,
            chart_data: submission.chart_data,
            data_sources: submission.data_sources,
            research_results: submission.research_results,
            status: SubmissionStatus::PendingReview,
            created_at: Utc::now().trunc_subsecs(6),
            reviewed_at: None,
            rejection_reason: None,
        };

        self.conn.execute(
            &format!(
                "INSERT INTO submissions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                COLUMNS
            ),
            params![
                record.id.to_string(),
                &record.author,
                &record.raw_input,
                &record.ai_draft,
                &record.graphic_description,
                &record.graphic_type,
                &record.graphic_data,
                record.data_sources.as_ref().map(serde_json::to_string).transpose()?,
                record.research_results.as_ref().map(serde_json::to_string).transpose()?,
                record.status.as_str(),
                format_timestamp(&record.created_at),
                Option::<String>::None,
                Option::<String>::None,
                &record.chart_data,
            ],
        )?;

        info!("Stored submission {} from {}", record.id, record.author);
        Ok(record)
    }

    fn get_submission(&self, id: SubmissionId) -> Result<Option<Submission>, Self::Error> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM submissions WHERE id = ?1", COLUMNS),
                params![id.to_string()],
                SubmissionRow::read,
            )
            .optional()?;

        row.map(SubmissionRow::into_submission).transpose()
    }

    fn list_pending(&self) -> Result<Vec<Submission>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM submissions WHERE status = ?1 ORDER BY created_at DESC, id DESC",
            COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![SubmissionStatus::PendingReview.as_str()], SubmissionRow::read)?
            .collect::<Result<Vec<_>, _>>()?;

        let submissions = rows
            .into_iter()
            .map(SubmissionRow::into_submission)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Listed {} pending submissions", submissions.len());
        Ok(submissions)
    }

    fn update_submission(
        &mut self,
        id: SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Option<Submission>, Self::Error> {
        let Some(mut submission) = self.get_submission(id)? else {
            return Ok(None);
        };
        patch.apply_to(&mut submission);
        // stored precision is microseconds
        submission.reviewed_at = submission.reviewed_at.map(|at| at.trunc_subsecs(6));

        self.conn.execute(
            "UPDATE submissions
             SET status = ?2, ai_draft = ?3, graphic_data = ?4, reviewed_at = ?5, rejection_reason = ?6
             WHERE id = ?1",
            params![
                id.to_string(),
                submission.status.as_str(),
                &submission.ai_draft,
                &submission.graphic_data,
                submission.reviewed_at.as_ref().map(format_timestamp),
                &submission.rejection_reason,
            ],
        )?;

        info!("Updated submission {} (status {})", id, submission.status.as_str());
        Ok(Some(submission))
    }

    fn delete_submission(&mut self, id: SubmissionId) -> Result<bool, Self::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM submissions WHERE id = ?1", params![id.to_string()])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format_sorts_as_text() {
        let early = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z").unwrap().with_timezone(&Utc);
        let late = DateTime::parse_from_rfc3339("2026-01-02T03:04:05.5Z").unwrap().with_timezone(&Utc);
        let (a, b) = (format_timestamp(&early), format_timestamp(&late));
        assert_eq!(a, "2026-01-02T03:04:05.000000Z");
        assert!(a < b);
        assert_eq!(parse_timestamp(&b).unwrap(), late);
    }

    #[test]
    fn test_unknown_status_is_invalid_data() {
        let store = SqliteStore::new(":memory:").unwrap();
        store
            .conn
            .execute(
                &format!(
                    "INSERT INTO submissions ({}) VALUES (?1, 'a', '', NULL, NULL, NULL, NULL, NULL, NULL, 'archived', ?2, NULL, NULL, NULL)",
                    COLUMNS
                ),
                params![SubmissionId::new().to_string(), format_timestamp(&Utc::now())],
            )
            .unwrap();
        assert!(matches!(store.list_pending(), Ok(ref v) if v.is_empty()));

        let id = SubmissionId::new();
        store
            .conn
            .execute(
                &format!(
                    "INSERT INTO submissions ({}) VALUES (?1, 'a', '', NULL, NULL, NULL, NULL, NULL, NULL, 'archived', ?2, NULL, NULL, NULL)",
                    COLUMNS
                ),
                params![id.to_string(), format_timestamp(&Utc::now())],
            )
            .unwrap();
        assert!(matches!(store.get_submission(id), Err(StoreError::InvalidData(_))));
    }
}
