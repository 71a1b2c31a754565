//! Drawing primitives produced by the model layer.
//!
//! Shapes arrive as JSON objects inside the `"shapes"` array of a model
//! turn. The wire format is flat and duck-typed, so every numeric field here
//! is optional: a shape missing a required field still *parses*, and the
//! rasterizer degrades it to an empty point set instead of failing the turn.
//!
//! ## Wire examples
//!
//! ```json
//! {"type":"circle","cx":10,"cy":10,"r":5,"color":"#ef4444"}
//! {"type":"rect","x":0,"y":0,"width":20,"height":20,"fill":"#3b82f6"}
//! {"type":"polygon","points":[[0,0],[10,0],[5,8]],"color":"green"}
//! ```

use serde::{Deserialize, Serialize};

use crate::geom::PathCommand;

/// Optional style attributes shared by every shape variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color as hex or CSS color name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fill color as hex or CSS color name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Stroke width in pixels.
    #[serde(
        default,
        rename = "strokeWidth",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke_width: Option<f64>,
    /// Opacity from 0.0 to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// A drawing primitive from the generated layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// A circle around a center point.
    Circle {
        /// Center X coordinate.
        cx: Option<f64>,
        /// Center Y coordinate.
        cy: Option<f64>,
        /// Radius in pixels.
        r: Option<f64>,
        /// Style attributes.
        #[serde(flatten)]
        style: ShapeStyle,
    },

    /// An axis-aligned ellipse around a center point.
    Ellipse {
        /// Center X coordinate.
        cx: Option<f64>,
        /// Center Y coordinate.
        cy: Option<f64>,
        /// Horizontal radius in pixels.
        rx: Option<f64>,
        /// Vertical radius in pixels.
        ry: Option<f64>,
        /// Style attributes.
        #[serde(flatten)]
        style: ShapeStyle,
    },

    /// An axis-aligned rectangle from an origin corner.
    Rect {
        /// Origin X coordinate.
        x: Option<f64>,
        /// Origin Y coordinate.
        y: Option<f64>,
        /// Width in pixels.
        width: Option<f64>,
        /// Height in pixels.
        height: Option<f64>,
        /// Style attributes.
        #[serde(flatten)]
        style: ShapeStyle,
    },

    /// A straight line segment.
    Line {
        /// First endpoint X coordinate.
        x1: Option<f64>,
        /// First endpoint Y coordinate.
        y1: Option<f64>,
        /// Second endpoint X coordinate.
        x2: Option<f64>,
        /// Second endpoint Y coordinate.
        y2: Option<f64>,
        /// Style attributes.
        #[serde(flatten)]
        style: ShapeStyle,
    },

    /// A closed polygon over a vertex list.
    Polygon {
        /// Vertices as `[x, y]` pairs.
        #[serde(default)]
        points: Vec<[f64; 2]>,
        /// Style attributes.
        #[serde(flatten)]
        style: ShapeStyle,
    },

    /// An arbitrary path of SVG-style commands.
    Path {
        /// Path commands.
        #[serde(default)]
        commands: Vec<PathCommand>,
        /// Style attributes.
        #[serde(flatten)]
        style: ShapeStyle,
    },

    /// A shape type this crate does not know. Rasterizes to nothing.
    #[serde(other)]
    Unknown,
}

impl Shape {
    /// Style attributes, if this variant carries any.
    #[must_use]
    pub const fn style(&self) -> Option<&ShapeStyle> {
        match self {
            Self::Circle { style, .. }
            | Self::Ellipse { style, .. }
            | Self::Rect { style, .. }
            | Self::Line { style, .. }
            | Self::Polygon { style, .. }
            | Self::Path { style, .. } => Some(style),
            Self::Unknown => None,
        }
    }

    /// The color this shape should rasterize with: stroke color first,
    /// falling back to fill.
    #[must_use]
    pub fn display_color(&self) -> Option<&str> {
        let style = self.style()?;
        style.color.as_deref().or(style.fill.as_deref())
    }
}

/// A textual annotation placed at a canvas position.
///
/// The text may contain embedded line breaks; the rendering layer (out of
/// scope here) splits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsciiBlock {
    /// Text content, possibly multi-line.
    pub text: String,
    /// X position in canvas pixels.
    pub x: f64,
    /// Y position in canvas pixels.
    pub y: f64,
    /// Display color as hex or CSS color name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
