//! # Stream extraction
//!
//! Incremental extraction of drawing commands from token-by-token model
//! output. The model is instructed to produce one JSON object per turn:
//!
//! ```json
//! {
//!   "observation": "an empty canvas",
//!   "intention": "draw a sun in the corner",
//!   "shapes": [
//!     {"type":"circle","cx":40,"cy":40,"r":20,"color":"#eab308"}
//!   ],
//!   "blocks": [
//!     {"text":"hello","x":100,"y":100}
//!   ],
//!   "say": "Added a sun."
//! }
//! ```
//!
//! That text arrives as arbitrarily fragmented deltas, and generation can
//! take several seconds, so consumers want each shape the instant it is
//! syntactically complete rather than after the full response. The extractor
//! keeps the whole accumulated text and re-scans it on every fragment: for
//! buffers bounded at a few KB this is cheaper than it sounds, and it is
//! correct under *any* fragmentation pattern, which a persisted parser state
//! machine makes much harder to guarantee. Keep it this way.
//!
//! Create one extractor per streaming request. Instances share nothing, so
//! any number may run in parallel.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};
use crate::event::{ScalarField, StreamEvent, Usage};
use crate::shape::{AsciiBlock, Shape};

/// How much of the buffer tail to include in a final parse failure message.
const ERROR_TAIL_CHARS: usize = 120;

/// Incremental extractor over a stream of text fragments.
///
/// Feed fragments as they arrive with [`feed`](Self::feed); call
/// [`finish`](Self::finish) once the upstream source signals completion.
/// Neither operation panics or blocks, and `feed` never reports errors -
/// a fragment that does not yet close an item is simply awaited.
#[derive(Debug, Default)]
pub struct StreamExtractor {
    buffer: String,
    sent_shapes: usize,
    sent_blocks: usize,
    sent_observation: bool,
    sent_intention: bool,
    sent_say: bool,
    finished: bool,
}

impl StreamExtractor {
    /// Create a fresh extractor with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full text accumulated so far.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append a fragment and emit every item it newly completed.
    ///
    /// Events come out in non-decreasing index order per array, each index at
    /// most once, and a scalar field is emitted only after its closing quote
    /// has arrived - never a partial value.
    #[must_use = "emitted events must be forwarded to the consumer"]
    pub fn feed(&mut self, fragment: &str) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.push_str(fragment);
        self.drain(false)
    }

    /// Signal end of stream and emit whatever remains.
    ///
    /// If the buffer never formed a complete top-level object this returns a
    /// single `error` event; otherwise any items not yet emitted (a safety
    /// net - normal operation has emitted everything already) followed by a
    /// terminal `done` event carrying `usage` if supplied.
    ///
    /// Finishing twice is allowed: repeated calls return only `done`.
    #[must_use = "emitted events must be forwarded to the consumer"]
    pub fn finish(&mut self, usage: Option<Usage>) -> Vec<StreamEvent> {
        if self.finished {
            return vec![StreamEvent::Done { usage }];
        }
        self.finished = true;

        if let Err(e) = self.check_complete() {
            return vec![StreamEvent::Error {
                message: e.to_string(),
            }];
        }

        let mut events = self.drain(true);
        events.push(StreamEvent::Done { usage });
        events
    }

    /// Validate that the buffer holds a syntactically complete top-level
    /// object.
    fn check_complete(&self) -> ExtractResult<()> {
        let Some(start) = self.buffer.find('{') else {
            return Err(ExtractError::IncompleteOutput {
                tail: tail_of(&self.buffer),
            });
        };
        match serde_json::from_str::<serde_json::Value>(self.buffer[start..].trim()) {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::debug!("final buffer is not a complete object: {e}");
                Err(ExtractError::IncompleteOutput {
                    tail: tail_of(&self.buffer),
                })
            }
        }
    }

    /// Re-scan the buffer and emit everything newly completed.
    fn drain(&mut self, at_end: bool) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        // Everything is located relative to the top-level object, whose
        // start may be arbitrarily far back; scan only from its opening
        // brace.
        let Some(start) = self.buffer.find('{') else {
            return events;
        };
        let body: &str = &self.buffer[start..];

        for (i, candidate) in array_candidates(body, "blocks").iter().enumerate() {
            match emit_item::<AsciiBlock>(i, candidate, &mut self.sent_blocks, at_end, "blocks") {
                Emit::Value(value) => events.push(StreamEvent::Block { index: i, value }),
                Emit::Wait => break,
                Emit::Skip => {}
            }
        }

        for (i, candidate) in array_candidates(body, "shapes").iter().enumerate() {
            match emit_item::<Shape>(i, candidate, &mut self.sent_shapes, at_end, "shapes") {
                Emit::Value(value) => events.push(StreamEvent::Shape { index: i, value }),
                Emit::Wait => break,
                Emit::Skip => {}
            }
        }

        for (field, sent) in [
            (ScalarField::Observation, &mut self.sent_observation),
            (ScalarField::Intention, &mut self.sent_intention),
            (ScalarField::Say, &mut self.sent_say),
        ] {
            if *sent {
                continue;
            }
            if let Some(value) = quoted_field(body, field.as_str()) {
                *sent = true;
                events.push(StreamEvent::Field { name: field, value });
            }
        }

        events
    }
}

/// Outcome of considering one array candidate.
enum Emit<T> {
    /// Parsed and newly past the sent counter.
    Value(T),
    /// The trailing candidate is not settled yet; await more text.
    Wait,
    /// Already emitted, or skipped as a local parse fault.
    Skip,
}

fn emit_item<T: serde::de::DeserializeOwned>(
    index: usize,
    candidate: &Candidate<'_>,
    sent: &mut usize,
    at_end: bool,
    field: &str,
) -> Emit<T> {
    if index < *sent {
        return Emit::Skip;
    }
    if !candidate.confirmed && !at_end {
        return Emit::Wait;
    }
    match serde_json::from_str::<T>(candidate.text) {
        Ok(value) => {
            *sent = index + 1;
            Emit::Value(value)
        }
        Err(e) => {
            // The trailing candidate failing is expected mid-stream: it is
            // likely still incomplete. Earlier candidates are not supposed
            // to fail; treat that as a local fault and keep the stream
            // alive.
            if candidate.last && !at_end {
                return Emit::Wait;
            }
            tracing::warn!("skipping unparseable {field}[{index}]: {e}");
            *sent = index + 1;
            Emit::Skip
        }
    }
}

/// One brace-closed `{...}` substring inside an array field.
struct Candidate<'a> {
    text: &'a str,
    /// Text after the closing brace proves this element is really over
    /// (a `,` before the next element, or the array's `]`). The trailing
    /// candidate of a still-growing buffer stays unconfirmed until then.
    confirmed: bool,
    last: bool,
}

/// Collect the top-level `{...}` objects inside `"field": [...]`.
///
/// Brace depth crosses zero only at true object boundaries: the scan tracks
/// string state and escapes so braces inside text payloads cannot
/// desynchronize it. The scan stops at the array's closing `]` or at the end
/// of the (possibly still growing) buffer.
fn array_candidates<'a>(body: &'a str, field: &str) -> Vec<Candidate<'a>> {
    let Some(interior) = array_interior(body, field) else {
        return Vec::new();
    };

    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut depth = 0_u32;
    let mut in_string = false;
    let mut escaped = false;
    let mut object_start = None;
    let mut array_closed = false;
    let mut trailing_text = false;

    for (i, c) in interior.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    object_start = Some(i);
                    trailing_text = false;
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(start) = object_start.take() {
                        spans.push((start, i));
                        trailing_text = false;
                    }
                }
            }
            ']' if depth == 0 => {
                array_closed = true;
                break;
            }
            c if depth == 0 && !c.is_whitespace() => trailing_text = true,
            _ => {}
        }
    }

    let n = spans.len();
    spans
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| Candidate {
            text: &interior[start..=end],
            // Non-trailing candidates are followed by their successor's text;
            // the trailing one needs the array close, a delimiter, or the
            // start of the next (still open) object behind it.
            confirmed: i + 1 < n || array_closed || trailing_text || object_start.is_some(),
            last: i + 1 == n,
        })
        .collect()
}

/// The text following `"field": [`, if that opener has arrived.
///
/// The key text can also show up as a string *value* (`"observation":
/// "shapes"`), so occurrences not followed by a colon and the array opener
/// are skipped rather than treated as the key.
fn array_interior<'a>(body: &'a str, field: &str) -> Option<&'a str> {
    let key = format!("\"{field}\"");
    for (at, _) in body.match_indices(&key) {
        // A preceding backslash means the opening quote is escaped text
        // inside a string, not a key delimiter.
        if body[..at].ends_with('\\') {
            continue;
        }
        let Some(after_colon) = skip_ws(&body[at + key.len()..]).strip_prefix(':') else {
            continue;
        };
        if let Some(interior) = skip_ws(after_colon).strip_prefix('[') {
            return Some(interior);
        }
    }
    None
}

/// Extract the fully quoted value of a top-level scalar field.
///
/// Requires the closing quote to have arrived, which guarantees no partial
/// value is ever emitted. The value is unescaped through `serde_json` so
/// embedded `\"` and `\n` come out right. As in [`array_interior`], key
/// lookalikes in string values are scanned past, not mistaken for the key.
fn quoted_field(body: &str, field: &str) -> Option<String> {
    let key = format!("\"{field}\"");
    for (at, _) in body.match_indices(&key) {
        if body[..at].ends_with('\\') {
            continue;
        }
        let Some(after_colon) = skip_ws(&body[at + key.len()..]).strip_prefix(':') else {
            continue;
        };
        let value = skip_ws(after_colon);
        if !value.starts_with('"') {
            continue;
        }

        let mut escaped = false;
        for (i, c) in value.char_indices().skip(1) {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                return serde_json::from_str(&value[..=i]).ok();
            }
        }
        // Opening quote seen, closing quote still streaming in. Anything
        // later in the buffer is part of that value.
        return None;
    }
    None
}

fn skip_ws(s: &str) -> &str {
    s.trim_start_matches([' ', '\t', '\r', '\n'])
}

/// The last [`ERROR_TAIL_CHARS`] characters of the buffer, for diagnostics.
fn tail_of(s: &str) -> String {
    let skip = s.chars().count().saturating_sub(ERROR_TAIL_CHARS);
    s.chars().skip(skip).collect()
}

/// The fully parsed output of one completed (non-streaming) model turn.
///
/// Parsing a complete blob through [`TurnOutput::from_json`] yields the same
/// shapes and blocks, in the same order, as feeding it to a
/// [`StreamExtractor`] in arbitrary chunks; streaming is strictly an
/// early-emission optimization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnOutput {
    /// What the model saw on the canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    /// What the model intended to draw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,
    /// A message for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub say: Option<String>,
    /// Drawing primitives.
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Text annotations.
    #[serde(default)]
    pub blocks: Vec<AsciiBlock>,
}

impl TurnOutput {
    /// Parse a completed turn in one shot.
    ///
    /// Leading text before the top-level object is tolerated the same way
    /// the streaming path tolerates it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::IncompleteOutput`] if no top-level object is
    /// present, or [`ExtractError::Serialization`] if the object does not
    /// match the turn schema.
    pub fn from_json(text: &str) -> ExtractResult<Self> {
        let Some(start) = text.find('{') else {
            return Err(ExtractError::IncompleteOutput {
                tail: tail_of(text),
            });
        };
        Ok(serde_json::from_str(text[start..].trim())?)
    }
}
