//! Error types for resource dispatch.
//!
//! One enum covers both registration-time failures (returned to the caller of
//! [`crate::RestApi::add_resource`]) and per-request domain failures, which the
//! dispatcher maps to HTTP status codes via [`RestError::status`].
//!
//! # Error Categories
//!
//! | Category | Variants | Wire status |
//! |----------|----------|-------------|
//! | Registration | `DuplicateResource`, `NoEncoders`, `DuplicateExtension` | never emitted |
//! | Domain | `NotFound`, `NotImplemented` | 404 |
//! | Representation | `Decode` | 400 |
//! | Internal | `Encode`, `Json` | 500 |
//!
//! `NotFound` and `NotImplemented` map to the same status on purpose: a route
//! whose capability is unbound is wire-indistinguishable from an unknown
//! route. The distinct variants exist for diagnostics only.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for resource dispatch operations.
pub type Result<T> = std::result::Result<T, RestError>;

/// Errors that can occur during registration or request dispatch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RestError {
    /// A resource with this name is already registered.
    #[error("duplicate resource name: {0}")]
    DuplicateResource(String),

    /// A resource was registered with an empty encoder sequence.
    ///
    /// Negotiation falls back to the first registered encoder, so the
    /// sequence must never be empty.
    #[error("resource {0} registered without encoders")]
    NoEncoders(String),

    /// Two encoders in one registration share an extension token, which
    /// would make the extension route ambiguous.
    #[error("duplicate encoder extension: {0}")]
    DuplicateExtension(String),

    /// The requested resource instance does not exist.
    #[error("resource not found")]
    NotFound,

    /// The route shape is valid but the handler does not implement the
    /// capability.
    #[error("capability not implemented")]
    NotImplemented,

    /// The request body could not be parsed by the selected decoder.
    #[error("decode error: {0}")]
    Decode(String),

    /// A resource could not be serialized by the selected encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// JSON serialization or deserialization error outside of body decoding.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RestError {
    /// HTTP status code for this error when it crosses the dispatcher
    /// boundary.
    #[inline]
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound | RestError::NotImplemented => StatusCode::NOT_FOUND,
            RestError::Decode(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures that should never surface during dispatch.
    #[inline]
    #[must_use]
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            RestError::DuplicateResource(_)
                | RestError::NoEncoders(_)
                | RestError::DuplicateExtension(_)
        )
    }
}
