//! # Board Layout
//!
//! Cell-to-pixel transform shared by path overlays, hints and the renderer.

use crate::config::{CELL_GAP, FRAME_SIZE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::{Path, Position};
use serde::{Deserialize, Serialize};

/// Places a board centered in a viewport with a fixed spacing between cell centers.
///
/// `pixel(r, c) = viewport_center - (cols - 1, rows - 1) * spacing / 2 + (c, r) * spacing`
///
/// Padded border coordinates (`-1`, `rows`, `cols`) map one spacing outside the board, so
/// paths around the edge line up with the tiles.
///
/// # Examples
///
/// ```
/// use pairlink::{BoardLayout, Position};
///
/// let layout = BoardLayout::for_board(4, 6);
/// assert_eq!(layout.spacing(), 41.0);
/// assert_eq!(layout.cell_center(Position::new(0, 0)), (297.5, 238.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    rows: usize,
    cols: usize,
    spacing: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl BoardLayout {
    /// Default layout: sprite frame plus gap spacing in an 800x600 viewport.
    pub fn for_board(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            spacing: f64::from(FRAME_SIZE + CELL_GAP),
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Same viewport and spacing for a board of a different size.
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..self.clone()
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Pixel center of cell `(0, 0)`.
    pub fn origin(&self) -> (f64, f64) {
        let x = self.viewport_width / 2.0 - self.cols.saturating_sub(1) as f64 * self.spacing / 2.0;
        let y = self.viewport_height / 2.0 - self.rows.saturating_sub(1) as f64 * self.spacing / 2.0;
        (x, y)
    }

    /// Pixel center of a cell, border cells included.
    pub fn cell_center(&self, position: Position) -> (f64, f64) {
        let (x0, y0) = self.origin();
        (
            x0 + f64::from(position.col) * self.spacing,
            y0 + f64::from(position.row) * self.spacing,
        )
    }

    /// Pixel points of a path's turn points.
    pub fn path_points(&self, path: &Path) -> Vec<(f64, f64)> {
        path.points().iter().map(|&p| self.cell_center(p)).collect()
    }

    /// The padded cell whose center is nearest to a pixel, if it lies on the padded board.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<Position> {
        if self.spacing <= 0.0 {
            return None;
        }
        let (x0, y0) = self.origin();
        let col = ((x - x0) / self.spacing).round();
        let row = ((y - y0) / self.spacing).round();
        let in_range = |value: f64, size: usize| value >= -1.0 && value <= size as f64;
        if !in_range(row, self.rows) || !in_range(col, self.cols) {
            return None;
        }
        Some(Position::new(row as i32, col as i32))
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::for_board(crate::config::DEFAULT_ROWS, crate::config::DEFAULT_COLS)
    }
}
