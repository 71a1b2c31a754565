//! Error types for turn extraction.

use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur while extracting a model turn.
///
/// Mid-stream gaps (a fragment that does not yet close an item) are not
/// errors; the extractor simply waits for more text. Only a stream that ends
/// without ever forming a complete top-level object is reported.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The stream ended but the accumulated text never formed a complete
    /// top-level object.
    #[error("model output is not a complete top-level object (tail: {tail:?})")]
    IncompleteOutput {
        /// Trailing portion of the accumulated buffer, for diagnostics.
        tail: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
