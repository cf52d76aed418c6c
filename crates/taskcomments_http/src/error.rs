//! API error type and status mapping.

use crate::dto::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use std::fmt::{Display, Formatter};
use taskcomments_core::{CommentServiceError, TaskServiceError};

const STORAGE_ERROR_MESSAGE: &str = "database error";
const INVALID_JSON_MESSAGE: &str = "invalid JSON body";

/// Error returned by every handler; renders as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn invalid_json() -> Self {
        Self::bad_request(INVALID_JSON_MESSAGE)
    }

    /// 500 with a fixed message. The detail goes to the log, not the client.
    ///
    /// Use for failures no service has logged yet.
    pub fn storage(detail: impl Display) -> Self {
        error!("event=http_storage_error module=http status=error error={detail}");
        Self::storage_logged()
    }

    // Services log their own storage failures.
    fn storage_logged() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_ERROR_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<CommentServiceError> for ApiError {
    fn from(value: CommentServiceError) -> Self {
        match value {
            CommentServiceError::TaskNotFound(_) => Self::not_found("task not found"),
            CommentServiceError::CommentNotFound(_) => Self::not_found("comment not found"),
            CommentServiceError::Validation(err) => Self::bad_request(err.to_string()),
            CommentServiceError::Storage(_) => Self::storage_logged(),
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(value: TaskServiceError) -> Self {
        match value {
            TaskServiceError::TaskNotFound(_) => Self::not_found("task not found"),
            TaskServiceError::Validation(err) => Self::bad_request(err.to_string()),
            TaskServiceError::Storage(_) => Self::storage_logged(),
        }
    }
}
