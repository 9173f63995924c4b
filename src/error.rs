//! Error types for HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use tracing::error;

/// Store operation an error came from, used for log context and the
/// message returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOp {
    Create,
    List,
    Update,
    Complete,
    Delete,
}

impl TaskOp {
    /// Opaque text sent to the client when the store fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            TaskOp::Create => "Error saving to the database.",
            TaskOp::List => "Error fetching data.",
            TaskOp::Update => "Error editing task.",
            TaskOp::Complete => "Error updating task.",
            TaskOp::Delete => "Error deleting task.",
        }
    }
}

impl fmt::Display for TaskOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskOp::Create => "create",
            TaskOp::List => "list",
            TaskOp::Update => "update",
            TaskOp::Complete => "complete",
            TaskOp::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required field missing or empty.
    #[error("{0}")]
    Validation(String),

    /// Request body could not be parsed.
    #[error("{0}")]
    InvalidBody(String),

    /// Store access failed. Detail is logged, never sent.
    #[error("{op} failed: {source}")]
    Store {
        op: TaskOp,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::Validation("Title and due date are required.".to_string())
    }

    pub fn store(op: TaskOp) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| ApiError::Store { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(message) | ApiError::InvalidBody(message) => {
                (status, message).into_response()
            }
            ApiError::Store { op, source } => {
                error!(operation = %op, error = %format!("{:#}", source), "task store error");
                (status, op.failure_message()).into_response()
            }
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
