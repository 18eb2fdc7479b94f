//! HTTP error handling for godw.
//!
//! Errors are answered with a plain-text body naming the offending file.
//! Missing admin capability is never an error page: it redirects back to
//! the listing.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::GodwError;

/// Path of the listing view; soft-denied and completed requests land here.
pub const LISTING_PATH: &str = "/";

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Admin capability missing; answered with a redirect (302).
    Unauthorized,
    /// Conflict (409).
    Conflict,
    /// Payload too large (413).
    PayloadTooLarge,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Web error type.
#[derive(Debug)]
pub struct WebError {
    code: ErrorCode,
    message: String,
}

impl WebError {
    /// Create a new web error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a soft-deny error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create a payload too large error.
    pub fn too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A `302 Found` redirect.
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.code == ErrorCode::Unauthorized {
            tracing::debug!(reason = %self.message, "soft-denied, redirecting to listing");
            return found(LISTING_PATH);
        }

        let status = self.code.status_code();
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for WebError {}

impl From<GodwError> for WebError {
    fn from(err: GodwError) -> Self {
        match err {
            GodwError::InvalidInput(msg) => WebError::bad_request(format!("WARN: {msg}")),
            GodwError::NotFound(name) => {
                WebError::internal(format!("WARN: [{name}] file not exists ..."))
            }
            GodwError::Exists(name) => {
                WebError::conflict(format!("WARN: [{name}] file exists ..."))
            }
            GodwError::TooLarge { name, size, limit } => WebError::too_large(format!(
                "WARN: [{name}] upload of {size} bytes exceeds the {limit} byte limit ..."
            )),
            GodwError::ExhaustedNamespace(name) => {
                WebError::internal(format!("WARN: [{name}] file exists, no free name left ..."))
            }
            GodwError::Unauthorized(msg) => WebError::unauthorized(msg),
            err @ (GodwError::Io(_) | GodwError::Config(_)) => {
                tracing::error!(error = %err, "internal error");
                WebError::internal(err.to_string())
            }
        }
    }
}
