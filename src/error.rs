//! Error types for the service
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::models::{ErrorResponse, FieldError, ValidationErrorResponse};

// == Cache Error Enum ==
/// Failures inside the cache store.
///
/// These never reach callers of `TtlCache`: they are logged and turned into
/// a miss, a `false` or a zero count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The store is full and the eviction policy refused the new key
    #[error("Cache full: cannot hold more than {max_keys} keys")]
    CapacityExceeded { max_keys: usize },

    /// Internal fault such as a lock poisoned by a panicking thread
    #[error("Internal cache error: {0}")]
    Internal(String),
}

/// Convenience Result type for cache store operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// == API Error Enum ==
/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Malformed or out-of-range request data
    #[error("{0}")]
    BadRequest(String),

    /// Request body failed field validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
}

// == Body Rejections ==
/// Prefix axum puts in front of a serde error when a body has the wrong shape
const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                ApiError::Validation(vec![body_field_error(&err.body_text())])
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Splits `path: message` out of a deserialization failure.
///
/// Errors at the document root carry no path and are reported against `body`.
fn body_field_error(text: &str) -> FieldError {
    let detail = text.strip_prefix(DESERIALIZE_PREFIX).unwrap_or(text);
    let (field, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(' ') => (path, message),
        _ => ("body", detail),
    };

    FieldError {
        field: field.to_string(),
        message: message.to_string(),
        value: Value::Null,
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(errors) => {
                let body = ValidationErrorResponse::new(errors);
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Convenience Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
