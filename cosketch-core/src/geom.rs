//! Canvas-space geometry - points, path commands, and free-hand strokes.

use serde::{Deserialize, Serialize};

/// A canvas-space coordinate.
///
/// Coordinates carry no inherent bounds; clamping happens at rasterization
/// time, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position in canvas pixels.
    pub x: f64,
    /// Y position in canvas pixels.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A single SVG-style path command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PathCommand {
    /// Move the pen without drawing.
    Move {
        /// Target X coordinate.
        x: f64,
        /// Target Y coordinate.
        y: f64,
    },

    /// Draw a straight line to a point.
    Line {
        /// Target X coordinate.
        x: f64,
        /// Target Y coordinate.
        y: f64,
    },

    /// Draw a quadratic curve with one control point.
    Quadratic {
        /// Control point X coordinate.
        cx: f64,
        /// Control point Y coordinate.
        cy: f64,
        /// Target X coordinate.
        x: f64,
        /// Target Y coordinate.
        y: f64,
    },

    /// Draw a cubic curve with two control points.
    Cubic {
        /// First control point X coordinate.
        c1x: f64,
        /// First control point Y coordinate.
        c1y: f64,
        /// Second control point X coordinate.
        c2x: f64,
        /// Second control point Y coordinate.
        c2y: f64,
        /// Target X coordinate.
        x: f64,
        /// Target Y coordinate.
        y: f64,
    },
}

impl PathCommand {
    /// The terminal endpoint of this command.
    #[must_use]
    pub const fn endpoint(&self) -> Point {
        match *self {
            Self::Move { x, y }
            | Self::Line { x, y }
            | Self::Quadratic { x, y, .. }
            | Self::Cubic { x, y, .. } => Point::new(x, y),
        }
    }
}

/// A free-hand stroke drawn by the human layer.
///
/// Strokes are produced once by the input surface and consumed read-only by
/// the encoder; nothing in this crate mutates them after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Ordered path commands making up the stroke.
    pub commands: Vec<PathCommand>,
    /// Display color as a hex string or CSS color name.
    pub color: String,
    /// Stroke width in pixels.
    #[serde(default = "Stroke::default_width")]
    pub width: f64,
}

impl Stroke {
    /// Create a new stroke with the default width.
    #[must_use]
    pub fn new(commands: Vec<PathCommand>, color: impl Into<String>) -> Self {
        Self {
            commands,
            color: color.into(),
            width: Self::default_width(),
        }
    }

    /// Set the stroke width.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    const fn default_width() -> f64 {
        4.0
    }
}
