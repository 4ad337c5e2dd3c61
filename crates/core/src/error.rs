//! Error types for AlmaCut.

use thiserror::Error;

/// Result type alias for AlmaCut operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or interpreting an optimization result.
///
/// Malformed tree nodes and non-renderable leaves are deliberately NOT
/// errors: they degrade to [`crate::tree::CutNode::Empty`] or a skipped
/// placement so that a partial result still renders. Every variant here
/// is recoverable; the request slot is released and a new request can be
/// triggered.
#[derive(Debug, Error)]
pub enum Error {
    /// The optimizer service replied with a non-success status.
    #[error("optimizer request failed with status {status}: {body}")]
    Transport {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body text, surfaced verbatim to the user.
        body: String,
    },

    /// A line of the item catalog could not be parsed.
    #[error("catalog line {line}: {reason}")]
    Catalog {
        /// 1-based line number within the catalog text.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// A response body could not be decoded as JSON.
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
}
