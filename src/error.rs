//! Core error type.
//!
//! The pipeline itself never fails: tokenization,
//! classification, wait-k update, operation synthesis and local relaxation
//! are all total functions over their inputs. `StreamError` exists for the
//! two fallible boundaries the orchestrator sits behind: malformed
//! transcript input and unknown sessions. The API layer (`crate::api`)
//! wraps this in its own `ApiError` to attach HTTP status codes.

use thiserror::Error;

/// Errors surfaced at the orchestrator boundary.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Transcript input was missing required fields or failed to parse.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A session id referenced by a request does not exist.
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// Serialization error surfaced while encoding/decoding payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for fallible orchestrator operations.
pub type StreamResult<T> = std::result::Result<T, StreamError>;
