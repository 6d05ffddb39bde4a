//! HTTP error types for the QXP server.
//!
//! Maps domain errors from `qxp-core` into HTTP responses. Every error
//! produces a JSON body with a machine-readable `error` field and a
//! human-readable `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use qxp_core::error::{DraftError, FormError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Requested resource not found.
    NotFound(String),
    /// Client sent malformed input.
    BadRequest(String),
    /// Input was well-formed but failed validation.
    Invalid(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Invalid(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::InvalidFormId { .. } => Self::BadRequest(err.to_string()),
            DraftError::Encode { .. } | DraftError::Corrupt { .. } | DraftError::Storage(_) => {
                tracing::warn!(error = %err, "draft operation failed");
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::UnknownForm { .. } => Self::NotFound(err.to_string()),
            FormError::UnknownField { .. }
            | FormError::MissingField { .. }
            | FormError::InvalidEmail { .. }
            | FormError::InvalidChoice { .. }
            | FormError::AlreadySubmitted => Self::Invalid(err.to_string()),
        }
    }
}
