//! # Cosketch Core
//!
//! Core logic for AI co-drawing: incremental extraction of structured
//! drawing commands from a token-by-token model stream, and encoding of
//! canvas state back into a compact text grid the model can read.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  cosketch-core                   │
//! ├──────────────────────────────────────────────────┤
//! │  StreamExtractor       │  CanvasEncoder          │
//! │  - fragment buffer     │  - path sampling        │
//! │  - array scanning      │  - shape rasterizing    │
//! │  - exactly-once emit   │  - palette + grid       │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Data flow per turn: [`encoder::render`] turns the current strokes and
//! shapes into a text grid that is embedded in the model request; the
//! model's reply streams back as text deltas which a [`StreamExtractor`]
//! turns into discrete [`StreamEvent`]s the instant each item is complete.
//! The two halves never share mutable state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod encoder;
pub mod error;
pub mod event;
pub mod extract;
pub mod geom;
pub mod grid;
pub mod palette;
pub mod raster;
pub mod sampler;
pub mod shape;
pub mod stream;

pub use encoder::{encode, render, DEFAULT_CELL_SIZE_PX};
pub use error::{ExtractError, ExtractResult};
pub use event::{ScalarField, StreamEvent, Usage};
pub use extract::{StreamExtractor, TurnOutput};
pub use geom::{PathCommand, Point, Stroke};
pub use grid::Grid;
pub use palette::symbol_for;
pub use raster::shape_points;
pub use sampler::{interpolate, sample_path};
pub use shape::{AsciiBlock, Shape, ShapeStyle};
pub use stream::extract_events;

/// Cosketch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
