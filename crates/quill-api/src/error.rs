//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use quill_store::StoreError;
use quill_writer::WriterError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request
    #[error("{0}")]
    BadRequest(String),

    /// Unknown submission id
    #[error("{0}")]
    NotFound(String),

    /// A pipeline stage produced nothing usable
    #[error("{0}")]
    Internal(String),

    /// Drafting failed
    #[error("Failed to draft post: {0}")]
    Writer(#[from] WriterError),

    /// Storage failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// 404 for a submission id
    pub fn submission_not_found() -> Self {
        ApiError::NotFound("Submission not found".to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Writer(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
