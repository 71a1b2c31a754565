//! # Canvas encoding
//!
//! Converts vector canvas content into the compact character grid the model
//! reads at the start of each turn. Two provenance layers are distinguished
//! by letter case: human strokes write uppercase symbols, previously
//! generated shapes write lowercase and are rasterized after the strokes so
//! they sit visually "on top".
//!
//! The encoder is a pure function: no suspension points, no shared state.
//! It is safe to call from any number of turns concurrently as long as each
//! call gets its own snapshot of strokes and shapes.

use crate::geom::Stroke;
use crate::grid::Grid;
use crate::palette;
use crate::raster::shape_points;
use crate::sampler::{interpolate, sample_path};
use crate::shape::Shape;

/// Default edge length of a grid cell in canvas pixels.
pub const DEFAULT_CELL_SIZE_PX: u32 = 20;

/// Rasterize canvas content into a character grid.
///
/// The grid is exactly `ceil(canvas_width / cell_size_px)` by
/// `ceil(canvas_height / cell_size_px)` cells. Sampled points are densified
/// to half a cell so cells along a path are never skipped; points outside
/// the canvas are silently dropped. A later write wins over an earlier one
/// within the pass, except that the eraser (white) never overwrites content.
///
/// One degenerate shape never spoils the render: it simply rasterizes to
/// nothing.
#[must_use]
pub fn render(
    strokes: &[Stroke],
    shapes: &[Shape],
    canvas_width: u32,
    canvas_height: u32,
    cell_size_px: u32,
) -> Grid {
    let cell_size_px = cell_size_px.max(1);
    let mut grid = Grid::new(
        canvas_width.div_ceil(cell_size_px) as usize,
        canvas_height.div_ceil(cell_size_px) as usize,
        cell_size_px,
    );
    let step = f64::from(cell_size_px) / 2.0;

    // Human layer first
    for stroke in strokes {
        let symbol = palette::symbol_for(&stroke.color);
        for point in interpolate(&sample_path(&stroke.commands), step) {
            grid.plot(point, symbol);
        }
    }

    // Generated layer second, lowercased
    for shape in shapes {
        let symbol = shape
            .display_color()
            .map_or(palette::FALLBACK_SYMBOL, palette::symbol_for)
            .to_ascii_lowercase();
        for point in interpolate(&shape_points(shape), step) {
            grid.plot(point, symbol);
        }
    }

    tracing::trace!(
        strokes = strokes.len(),
        shapes = shapes.len(),
        width = grid.width(),
        height = grid.height(),
        "rendered canvas grid"
    );
    grid
}

/// Render and serialize in one call, appending a caller-supplied legend
/// describing the color-to-symbol mapping.
#[must_use]
pub fn encode(
    strokes: &[Stroke],
    shapes: &[Shape],
    canvas_width: u32,
    canvas_height: u32,
    cell_size_px: u32,
    legend: &str,
) -> String {
    let grid = render(strokes, shapes, canvas_width, canvas_height, cell_size_px);
    let mut out = grid.to_text();
    if !legend.is_empty() {
        out.push('\n');
        out.push_str(legend);
        if !legend.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
