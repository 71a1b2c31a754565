//! Events emitted while extracting a streamed model turn.
//!
//! Callers typically forward these to a live UI as they are produced, e.g.
//! re-encoded as Server-Sent Events:
//!
//! ```text
//! event: shape
//! data: {"index":0,"value":{"type":"circle","cx":10,"cy":10,"r":5}}
//!
//! event: field
//! data: {"name":"say","value":"Added a sun."}
//!
//! event: done
//! data: {"usage":{"input_tokens":812,"output_tokens":145}}
//! ```

use serde::{Deserialize, Serialize};

use crate::shape::{AsciiBlock, Shape};

/// Scalar narration fields of a model turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarField {
    /// What the model saw on the canvas.
    Observation,
    /// What the model intends to draw.
    Intention,
    /// A message for the user.
    Say,
}

impl ScalarField {
    /// The field name as it appears in the model's JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Intention => "intention",
            Self::Say => "say",
        }
    }
}

/// Token accounting reported by the upstream model transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    /// Tokens produced by the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
}

/// An event produced by the stream extractor.
///
/// Per array, `index` values are non-decreasing and each index is emitted at
/// most once. `Done` and `Error` are terminal: after either, the extractor
/// emits nothing further except `Done` on a repeated finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A shape became syntactically complete.
    Shape {
        /// Position in the `"shapes"` array.
        index: usize,
        /// The parsed shape.
        value: Shape,
    },

    /// A text block became syntactically complete.
    Block {
        /// Position in the `"blocks"` array.
        index: usize,
        /// The parsed block.
        value: AsciiBlock,
    },

    /// A scalar narration field closed its quote.
    Field {
        /// Which field.
        name: ScalarField,
        /// The field's full value.
        value: String,
    },

    /// The turn completed.
    Done {
        /// Token accounting supplied by the caller, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
    },

    /// The turn ended without a parseable top-level object.
    Error {
        /// Description of the failure, including the buffer tail.
        message: String,
    },
}

impl StreamEvent {
    /// Returns true if this event terminates the stream (`Done` or `Error`).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}
