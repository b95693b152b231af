//! # Grid
//!
//! The `rows × cols` matrix of tile types and the padded view used by path search.

use crate::{PairlinkError, PairlinkResult, Position};
use serde::{Deserialize, Serialize};

/// Tile type identifier. Non-negative values are types, [`EMPTY`] marks a free cell.
pub type TypeId = i32;

/// Sentinel for a cell without a tile.
pub const EMPTY: TypeId = -1;

/// Fixed-size matrix of cell values stored row-major.
///
/// Dimensions never change after construction.
///
/// # Examples
///
/// ```
/// use pairlink::{Grid, EMPTY};
///
/// let mut grid = Grid::new(2, 3);
/// assert_eq!(grid.get(1, 2).unwrap(), EMPTY);
/// grid.set(1, 2, 7).unwrap();
/// assert_eq!(grid.get(1, 2).unwrap(), 7);
/// assert!(grid.get(2, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<TypeId>,
}

impl Grid {
    /// Creates a grid where every cell is empty.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![EMPTY; rows * cols],
        }
    }

    /// Builds a grid from nested rows.
    ///
    /// Fails if the rows are ragged or a value is below [`EMPTY`].
    pub fn from_rows(rows: Vec<Vec<TypeId>>) -> PairlinkResult<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(height * width);

        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(PairlinkError::InvalidState(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    width
                )));
            }
            if let Some(bad) = row.iter().find(|&&value| value < EMPTY) {
                return Err(PairlinkError::InvalidState(format!(
                    "invalid cell value {} in row {}",
                    bad, r
                )));
            }
            cells.extend(row);
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    /// Builds a grid from a flat row-major buffer.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<TypeId>) -> PairlinkResult<Self> {
        if cells.len() != rows * cols {
            return Err(PairlinkError::InvalidState(format!(
                "{} cells cannot fill a {}x{} grid",
                cells.len(),
                rows,
                cols
            )));
        }
        if let Some(bad) = cells.iter().find(|&&value| value < EMPTY) {
            return Err(PairlinkError::InvalidState(format!(
                "invalid cell value {}",
                bad
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[TypeId] {
        &self.cells
    }

    /// Mutable row-major cells. Written values must stay at or above [`EMPTY`].
    pub(crate) fn cells_mut(&mut self) -> &mut [TypeId] {
        &mut self.cells
    }

    /// Whether `(row, col)` lies inside the logical grid.
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Reads a cell.
    pub fn get(&self, row: i32, col: i32) -> PairlinkResult<TypeId> {
        let index = self.index(row, col)?;
        Ok(self.cells[index])
    }

    /// Reads the cell at `pos`.
    pub fn at(&self, pos: Position) -> PairlinkResult<TypeId> {
        self.get(pos.row, pos.col)
    }

    /// Writes a cell. Only the board manager mutates a live grid.
    pub fn set(&mut self, row: i32, col: i32, value: TypeId) -> PairlinkResult<()> {
        if value < EMPTY {
            return Err(PairlinkError::InvalidAction(format!(
                "invalid cell value {}",
                value
            )));
        }
        let index = self.index(row, col)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Iterates over `(position, type)` for every occupied cell in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, TypeId)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != EMPTY)
            .map(move |(i, &value)| (Position::new((i / cols) as i32, (i % cols) as i32), value))
    }

    /// Iterates over every logical position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| Position::new((i / cols) as i32, (i % cols) as i32))
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value != EMPTY).count()
    }

    /// Returns the cells as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<TypeId>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[TypeId]>::to_vec).collect()
    }

    /// Copies the grid into a view with one empty cell of border on every side.
    pub fn padded_view(&self) -> PaddedGrid {
        let width = self.cols + 2;
        let mut cells = vec![EMPTY; (self.rows + 2) * width];
        for r in 0..self.rows {
            let src = &self.cells[r * self.cols..(r + 1) * self.cols];
            let start = (r + 1) * width + 1;
            cells[start..start + self.cols].copy_from_slice(src);
        }
        PaddedGrid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    fn index(&self, row: i32, col: i32) -> PairlinkResult<usize> {
        if !self.contains(row, col) {
            return Err(PairlinkError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row as usize * self.cols + col as usize)
    }
}

/// A `(rows + 2) × (cols + 2)` snapshot of a grid with an empty border.
///
/// Lookups take logical coordinates; `-1` and `rows`/`cols` address the border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedGrid {
    rows: usize,
    cols: usize,
    cells: Vec<TypeId>,
}

impl PaddedGrid {
    /// Logical row count (border excluded).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Logical column count (border excluded).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `pos` lies inside the padded area.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= -1 && pos.col >= -1 && pos.row <= self.rows as i32 && pos.col <= self.cols as i32
    }

    /// Cell value at a logical position, `None` beyond the border.
    pub fn get(&self, pos: Position) -> Option<TypeId> {
        if !self.contains(pos) {
            return None;
        }
        let index = (pos.row + 1) as usize * (self.cols + 2) + (pos.col + 1) as usize;
        Some(self.cells[index])
    }

    /// Whether `pos` is inside the padded area and empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Some(EMPTY)
    }

    /// Iterates over every empty padded position, border included, in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.cols + 2;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == EMPTY)
            .map(move |(i, _)| Position::new((i / width) as i32 - 1, (i % width) as i32 - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_starts_empty() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.occupied_count(), 0);
        assert!(grid.cells().iter().all(|&v| v == EMPTY));
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid = Grid::new(2, 2);
        assert!(matches!(
            grid.get(-1, 0),
            Err(PairlinkError::OutOfBounds { row: -1, col: 0, .. })
        ));
        assert!(matches!(
            grid.get(0, 2),
            Err(PairlinkError::OutOfBounds { .. })
        ));
        assert!(grid.set(2, 0, 1).is_err());
        assert!(grid.set(1, 1, 1).is_ok());
    }

    #[test]
    fn test_grid_rejects_bad_values() {
        let mut grid = Grid::new(1, 1);
        assert!(grid.set(0, 0, -2).is_err());
        assert!(Grid::from_rows(vec![vec![0, -5]]).is_err());
        assert!(Grid::from_cells(1, 2, vec![0]).is_err());
    }

    #[test]
    fn test_grid_from_rows_rejects_ragged() {
        let result = Grid::from_rows(vec![vec![1, 2], vec![3]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_grid_rows_round_trip() {
        let rows = vec![vec![1, -1, 2], vec![-1, 3, -1]];
        let grid = Grid::from_rows(rows.clone()).unwrap();
        assert_eq!(grid.to_rows(), rows);
        assert_eq!(grid.get(1, 1).unwrap(), 3);
        assert_eq!(grid.occupied_count(), 3);
    }

    #[test]
    fn test_occupied_iteration_is_row_major() {
        let grid = Grid::from_rows(vec![vec![-1, 4], vec![5, -1]]).unwrap();
        let occupied: Vec<_> = grid.occupied().collect();
        assert_eq!(
            occupied,
            vec![(Position::new(0, 1), 4), (Position::new(1, 0), 5)]
        );
    }

    #[test]
    fn test_padded_view_has_empty_border() {
        let grid = Grid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let padded = grid.padded_view();

        for col in -1..=2 {
            assert!(padded.is_empty(Position::new(-1, col)));
            assert!(padded.is_empty(Position::new(2, col)));
        }
        for row in -1..=2 {
            assert!(padded.is_empty(Position::new(row, -1)));
            assert!(padded.is_empty(Position::new(row, 2)));
        }

        assert_eq!(padded.get(Position::new(0, 0)), Some(1));
        assert_eq!(padded.get(Position::new(1, 1)), Some(4));
        assert_eq!(padded.get(Position::new(3, 0)), None);
        assert!(!padded.is_empty(Position::new(-2, 0)));
    }

    #[test]
    fn test_padded_empty_positions_include_border() {
        let grid = Grid::from_rows(vec![vec![1]]).unwrap();
        let empties: Vec<_> = grid.padded_view().empty_positions().collect();
        assert_eq!(empties.len(), 8);
        assert!(!empties.contains(&Position::new(0, 0)));
        assert!(empties.contains(&Position::new(-1, -1)));
        assert!(empties.contains(&Position::new(1, 1)));
    }
}
