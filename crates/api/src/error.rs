//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, ApiError>`. Every error path produces a JSON body with an
//! `error` field; internal detail never reaches the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::storage::StorageError;
use crate::validation::FieldError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Payload failed schema validation.
    #[error("validation failed ({} field(s))", .0.len())]
    Validation(Vec<FieldError>),

    /// Resource not found (or hidden by a visibility rule).
    #[error("not found: {0}")]
    NotFound(String),

    /// No authenticated session.
    #[error("unauthorized")]
    Unauthorized,

    /// Authenticated but lacking admin privilege.
    #[error("forbidden")]
    Forbidden,

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Storage(err) => match err {
                StorageError::Conflict(_) => StatusCode::BAD_REQUEST,
                StorageError::Database(_) | StorageError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                // Duplicate email is a client error here, not a 409: the
                // public API contract predates this implementation.
                AuthError::EmailTaken | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry and log them with full detail
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Validation failures carry the structured field list; everything
        // else is a plain message with internals withheld
        let body = match &self {
            Self::Validation(errors) => json!({ "error": errors }),
            Self::Storage(StorageError::Conflict(msg)) => json!({ "error": msg }),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => json!({ "error": "Invalid credentials" }),
                AuthError::EmailTaken => json!({ "error": "Email already registered" }),
                AuthError::WeakPassword(msg) => json!({ "error": msg }),
                AuthError::PasswordHash | AuthError::Storage(_) => {
                    json!({ "error": "Internal server error" })
                }
            },
            Self::NotFound(what) => json!({ "error": format!("{what} not found") }),
            Self::Unauthorized => json!({ "error": "Unauthorized" }),
            Self::Forbidden => json!({ "error": "Forbidden - admin access required" }),
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) => {
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(ApiError::NotFound("Course".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(ApiError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(ApiError::Validation(vec![])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            get_status(ApiError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::Auth(AuthError::EmailTaken)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_is_withheld() {
        let response = ApiError::Internal("connection refused to 10.0.0.3".to_string());
        let display = response.to_string();
        // The Display impl is for logs; the HTTP body built above replaces it
        assert!(display.contains("connection refused"));

        let body = match &response {
            ApiError::Internal(_) => json!({ "error": "Internal server error" }),
            _ => unreachable!(),
        };
        assert_eq!(body["error"], "Internal server error");
    }
}
