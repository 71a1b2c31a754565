//! The character grid canvas state is encoded into.

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::palette::EMPTY_SYMBOL;

/// A fixed-size 2D grid of single-character cells.
///
/// Built fresh for each render pass, written while rasterizing, then
/// serialized with [`Grid::to_text`]. Never mutated after serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size_px: u32,
    cells: Vec<char>,
}

impl Grid {
    /// Create a grid of `width x height` cells, all empty.
    #[must_use]
    pub fn new(width: usize, height: usize, cell_size_px: u32) -> Self {
        Self {
            width,
            height,
            cell_size_px,
            cells: vec![EMPTY_SYMBOL; width * height],
        }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Edge length of one cell in canvas pixels.
    #[must_use]
    pub const fn cell_size_px(&self) -> u32 {
        self.cell_size_px
    }

    /// The symbol at `(col, row)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Write a symbol at `(col, row)`.
    ///
    /// Out-of-range cells are silently dropped. Writing the empty symbol is a
    /// no-op: erasure through color is visually inert, so a partially drawn
    /// erase gesture cannot blank out cells written earlier in the same pass.
    pub fn set(&mut self, col: usize, row: usize, symbol: char) {
        if symbol == EMPTY_SYMBOL || col >= self.width || row >= self.height {
            return;
        }
        self.cells[row * self.width + col] = symbol;
    }

    /// Write a symbol at the cell containing a canvas-space point.
    ///
    /// Points outside `[0, width*cell) x [0, height*cell)` are silently
    /// dropped; there is no wraparound.
    pub fn plot(&mut self, point: Point, symbol: char) {
        let cell = f64::from(self.cell_size_px);
        let (Some(col), Some(row)) = (cell_index(point.x, cell), cell_index(point.y, cell)) else {
            return;
        };
        self.set(col, row, symbol);
    }

    /// True if no cell has been written.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&c| c == EMPTY_SYMBOL)
    }

    /// Serialize to a line-oriented string with coordinate headers: a row of
    /// pixel-space column labels every 10 grid columns, then one line per
    /// grid row prefixed with its pixel-space offset.
    ///
    /// ```text
    ///      0         200       400
    ///    0 ......................
    ///   20 ....R.................
    ///   40 ...RrR................
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        let cell = self.cell_size_px as usize;
        let mut out = String::new();

        // Column header: pixel labels anchored at every 10th column
        let mut header = vec![' '; self.width];
        for col in (0..self.width).step_by(10) {
            for (i, ch) in (col * cell).to_string().chars().enumerate() {
                if col + i < self.width {
                    header[col + i] = ch;
                }
            }
        }
        out.push_str("     ");
        out.extend(header);
        out.push('\n');

        for row in 0..self.height {
            let offset = row * cell;
            out.push_str(&format!("{offset:>4} "));
            out.extend(&self.cells[row * self.width..(row + 1) * self.width]);
            out.push('\n');
        }

        out
    }
}

/// Map a canvas-space coordinate to its cell index.
///
/// A coordinate lying exactly on a cell's trailing edge belongs to that cell,
/// so a 20px-wide figure at the origin under a 20px cell stays inside cell 0.
/// Negative coordinates are out of range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_index(v: f64, cell: f64) -> Option<usize> {
    if v < 0.0 || !v.is_finite() {
        return None;
    }
    if v == 0.0 {
        return Some(0);
    }
    Some(((v / cell).ceil() - 1.0).max(0.0) as usize)
}
