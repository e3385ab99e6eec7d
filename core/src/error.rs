//! Error types for the Scryfall client core.
//!
//! # Design
//! Failures are split by where they happen: path resolution fails before any
//! I/O (`MissingParameter`), the transport fails on the wire (`Transport`),
//! the body fails to decode (`MalformedResponse`), or the service itself
//! answers with an error envelope (`Api`). Callers that want to retry only
//! need `is_transport()`; nothing in this crate retries on its own.

use serde::{Deserialize, Serialize};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScryfallError>;

/// The body of an `"object": "error"` envelope, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub code: String,
    pub details: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Errors returned by `Client` and the pipeline helpers.
#[derive(Debug, thiserror::Error)]
pub enum ScryfallError {
    /// A required `:name` placeholder had no value.
    #[error("missing required path parameter `{name}`")]
    MissingParameter { name: String },

    /// The configured base URL cannot be parsed or cannot take a path.
    #[error("invalid base URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Connection failure, timeout, or any other transport-level problem.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The body could not be decoded as a JSON envelope.
    #[error("malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// A non-2xx response whose body was not an error envelope.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The service returned a well-formed error envelope.
    #[error("API error {} ({}): {}", .0.status, .0.code, .0.details)]
    Api(ApiErrorBody),

    /// A request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A cache backend reported a failure of its own.
    #[error("cache backend error: {0}")]
    Cache(String),

    /// A lookup was constructed without any usable selector.
    #[error("invalid lookup: {0}")]
    InvalidLookup(String),

    /// A classified payload did not match the requested typed record.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl ScryfallError {
    /// True for failures that happened on the wire or while decoding the body.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScryfallError::Transport { .. } | ScryfallError::MalformedResponse { .. }
        )
    }

    /// The structured error envelope, if the service sent one.
    pub fn api_error(&self) -> Option<&ApiErrorBody> {
        match self {
            ScryfallError::Api(body) => Some(body),
            _ => None,
        }
    }
}
