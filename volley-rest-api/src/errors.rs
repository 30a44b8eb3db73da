//! REST API specific error types and conversions

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use volley_results::StoreError;
use volley_runner::RunnerError;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        RestError::Conflict(message.into())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        RestError::InternalError(message.into())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RestError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            RestError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            RestError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        let message = match self {
            RestError::BadRequest(msg) | RestError::Conflict(msg) | RestError::InternalError(msg) => msg,
        };

        let error_response = json!({
            "error": {
                "code": code,
                "message": message,
                "status": status.as_u16()
            }
        });
        (status, Json(error_response)).into_response()
    }
}

impl From<RunnerError> for RestError {
    fn from(err: RunnerError) -> Self {
        match err {
            RunnerError::AlreadyRunning => RestError::Conflict(err.to_string()),
            RunnerError::InvalidUrl => RestError::BadRequest(err.to_string()),
        }
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            // Corrupt archive bytes are a client error
            StoreError::Archive { .. } => RestError::BadRequest(err.to_string()),
            StoreError::Filesystem { .. } | StoreError::TaskJoin { .. } => {
                RestError::InternalError(err.to_string())
            }
        }
    }
}
