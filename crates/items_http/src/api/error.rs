//! API error bodies and status mapping.
//!
//! Core failures arrive as an `ErrorKind`; this module is the only place that
//! turns a kind into an HTTP status. Store failures are logged here and
//! reported to clients without their underlying message.

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use items_core::{ErrorKind, ImportError, ItemValidationError, RepoError};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const STORE_FAILURE_MESSAGE: &str = "internal storage error";

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable code for programmatic handling.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Field-level details for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Status code plus body, returned by every failing handler.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", message))
    }

    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(ErrorKind::StoreFailure.code(), STORE_FAILURE_MESSAGE),
        )
    }

    /// Builds the response for a classified core failure and logs it.
    pub fn from_core(op: &'static str, kind: ErrorKind, err: &dyn Display) -> Self {
        if !kind.is_client_fault() {
            error!(
                "event=http_request module=http op={} status=error error_code={} error={}",
                op,
                kind.code(),
                err
            );
            return Self::internal_error();
        }

        debug!(
            "event=http_request module=http op={} status=rejected error_code={}",
            op,
            kind.code()
        );
        Self::new(status_for(kind), ApiError::new(kind.code(), err.to_string()))
    }
}

/// HTTP status for each core error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidFileType
        | ErrorKind::DecodeError
        | ErrorKind::MissingColumns
        | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// Core errors that carry an `ErrorKind`.
pub trait Classified: Display {
    fn kind(&self) -> ErrorKind;
}

impl Classified for RepoError {
    fn kind(&self) -> ErrorKind {
        RepoError::kind(self)
    }
}

impl Classified for ImportError {
    fn kind(&self) -> ErrorKind {
        ImportError::kind(self)
    }
}

impl From<ItemValidationError> for ApiErrorResponse {
    fn from(err: ItemValidationError) -> Self {
        let mut error = ApiError::new(err.kind().code(), err.to_string());
        error.details = Some(vec![FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }]);
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            rejection.status(),
            ApiError::new("BAD_REQUEST", rejection.body_text()),
        )
    }
}

impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        Self::new(
            rejection.status(),
            ApiError::new("BAD_REQUEST", rejection.body_text()),
        )
    }
}

impl From<MultipartRejection> for ApiErrorResponse {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(
            rejection.status(),
            ApiError::new("BAD_REQUEST", rejection.body_text()),
        )
    }
}

impl From<MultipartError> for ApiErrorResponse {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), ApiError::new("BAD_REQUEST", err.body_text()))
    }
}
