//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;

/// API error response body.
///
/// Client errors carry only `error`; server errors add `details` with the
/// repository context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ApiError) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new(msg)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(msg)),
            AppError::Repository(e) => {
                let status = match &e {
                    RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
                    RepositoryError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
                    RepositoryError::ConnectionError { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let body = if e.is_client_error() {
                    ApiError::new(e.message())
                } else {
                    ApiError::new(e.message()).with_details(e.context().to_string())
                };
                (status, body)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %body.error, details = ?body.details, "request failed");
        }
        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ErrorContext;

    #[test]
    fn test_repository_errors_map_to_status_codes() {
        let cases = [
            (RepositoryError::not_found("Hospital not found"), StatusCode::NOT_FOUND),
            (
                RepositoryError::invalid_identifier("Invalid Hospital ID"),
                StatusCode::BAD_REQUEST,
            ),
            (
                RepositoryError::connection("pool exhausted"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RepositoryError::validation("bad wait time"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (RepositoryError::query("syntax"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let (status, _) = AppError::from(err).status_and_body();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_client_errors_carry_only_the_message() {
        let err = RepositoryError::not_found_with_context(
            "Hospital not found",
            ErrorContext::new("get_hospital").with_entity_id("abc"),
        );
        let (_, body) = AppError::from(err).status_and_body();
        assert_eq!(body, ApiError::new("Hospital not found"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "Hospital not found" })
        );
    }

    #[test]
    fn test_server_errors_include_context() {
        let err = RepositoryError::validation_with_context(
            "bad wait time",
            ErrorContext::new("list_hospitals"),
        );
        let (_, body) = AppError::from(err).status_and_body();
        assert_eq!(body.error, "bad wait time");
        assert_eq!(body.details.as_deref(), Some("[operation=list_hospitals]"));
    }
}
