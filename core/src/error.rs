//! Error types for the GenericBro API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the details screen treats a
//! missing medicine differently from a server failure. Every other non-200
//! response lands in `Http` carrying the backend's `detail` text (or a
//! generic status message when the body has none).
//!
//! Only `Transport` and `Timeout` are retryable; see [`crate::retry`].

use std::time::Duration;

use crate::retry::Endpoint;

/// Errors produced while building requests, executing them, or parsing
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL (or a URL derived from it) is unusable.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A search was requested with no name, formulation, type or dosage.
    #[error("at least one search field must be provided")]
    EmptyCriteria,

    /// The server returned 404.
    #[error("{detail}")]
    NotFound { detail: String },

    /// The server returned a non-200 status other than 404.
    #[error("{detail}")]
    Http { status: u16, detail: String },

    /// The response body did not have the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Connection, DNS, TLS or I/O failure before a status line arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// A single attempt exceeded the per-attempt timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Every attempt allowed by the retry policy failed.
    #[error("{endpoint} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        endpoint: Endpoint,
        attempts: u32,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }

    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }
}
