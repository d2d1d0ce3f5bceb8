//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind, UnknownStatus};
use thiserror::Error;

use crate::auth::Role;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by the order system.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Request that could not be turned into a domain call.
    #[error("{0}")]
    BadRequest(String),
    /// Missing or wrong credentials.
    #[error("Invalid username or password")]
    Unauthorized,
    /// Authenticated, but without the role the route needs.
    #[error("This action requires the {0} role")]
    Forbidden(Role),
}

impl ApiError {
    /// Status code and machine-readable kind for this error.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Domain(err) => {
                let status = match err.kind() {
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::Conflict | ErrorKind::State => StatusCode::CONFLICT,
                };
                (status, err.kind().as_str())
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorKind::Validation.as_str()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        tracing::debug!(%status, kind, error = %self, "request failed");

        let body = serde_json::json!({ "error": self.to_string(), "kind": kind });
        (status, axum::Json(body)).into_response()
    }
}

impl From<UnknownStatus> for ApiError {
    fn from(err: UnknownStatus) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
