//! Unified error taxonomy for the collector.
//!
//! Three caller-visible categories map onto HTTP statuses:
//! - validation failures (missing required fields, bad registration input): 400
//! - authentication failures (missing or invalid key): 401
//! - processing failures (malformed nested payload, bad timestamp, store): 500
//!
//! Processing failures carry an internal [`ProcessingKind`] so expected
//! failure modes stay distinguishable in logs while the HTTP body remains
//! a generic message.

use std::fmt;

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why an authentication attempt was rejected.
///
/// Both causes produce the same 401 response shape but are counted under
/// separate metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No candidate key in the request body or headers.
    MissingKey,
    /// A candidate key was present but matched no active client.
    InvalidKey,
}

impl AuthFailure {
    /// Message surfaced to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingKey => "Missing api_key",
            Self::InvalidKey => "Invalid API key",
        }
    }

    /// Label value for the error counter.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::MissingKey => "auth_missing",
            Self::InvalidKey => "auth_invalid",
        }
    }
}

/// What went wrong while normalizing or persisting an accepted submission.
///
/// The first two kinds are expected client mistakes; `Store` covers
/// everything underneath the persistence seam. All three respond with the
/// same generic 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingKind {
    /// A required nested field was absent, empty, or not a string.
    MissingNested(&'static str),
    /// `sent_at` could not be parsed as an ISO-8601 timestamp.
    BadTimestamp(String),
    /// The store rejected or failed the write.
    Store(String),
}

impl fmt::Display for ProcessingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNested(path) => write!(f, "missing or malformed field `{path}`"),
            Self::BadTimestamp(raw) => write!(f, "unparseable sent_at `{raw}`"),
            Self::Store(msg) => write!(f, "store failure: {msg}"),
        }
    }
}

/// Unified error type for the collector.
#[derive(Debug, Error)]
pub enum Error {
    /// A required top-level field was absent from the submission.
    #[error("Missing {0}")]
    MissingField(&'static str),

    /// Invalid client-supplied input outside the ingest contract.
    #[error("{0}")]
    Validation(String),

    /// Authentication failed.
    #[error("{}", .0.public_message())]
    Unauthorized(AuthFailure),

    /// The submission passed validation but could not be processed.
    #[error("event processing failed: {0}")]
    Processing(ProcessingKind),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn missing_key() -> Self {
        Self::Unauthorized(AuthFailure::MissingKey)
    }

    pub fn invalid_key() -> Self {
        Self::Unauthorized(AuthFailure::InvalidKey)
    }

    pub fn store_failure(msg: impl Into<String>) -> Self {
        Self::Processing(ProcessingKind::Store(msg.into()))
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingField(_) | Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Processing(_) => 500,
        }
    }

    /// Message safe to surface to the caller.
    ///
    /// Processing detail is deliberately withheld; it is logged server-side
    /// instead.
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Missing {field}"),
            Self::Validation(msg) => msg.clone(),
            Self::Unauthorized(cause) => cause.public_message().to_string(),
            Self::Processing(_) => "Failed to process event".to_string(),
        }
    }

    /// Label value for the error counter, if this error is counted.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::Validation(_) => "validation",
            Self::Unauthorized(cause) => cause.metric_label(),
            Self::Processing(_) => "processing",
        }
    }
}
