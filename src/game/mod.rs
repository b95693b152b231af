//! # Game Module
//!
//! Board state management, tile entities and the per-player session layer.
//!
//! This module contains the fundamental building blocks of the puzzle:
//! - The grid of tile types and its padded view
//! - Tile entities, including power tiles
//! - The board manager that owns tiles and performs matches
//! - Sessions that track selection, scores and timers for each player

pub mod board;
pub mod grid;
pub mod session;
pub mod tile;

pub use board::*;
pub use grid::*;
pub use session::*;
pub use tile::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cell coordinate on the board.
///
/// Coordinates are signed: the padded view around the grid adds one row and one column of
/// always-empty border on every side, so `-1` and `rows`/`cols` are valid path coordinates.
///
/// # Examples
///
/// ```
/// use pairlink::Position;
///
/// let pos = Position::new(2, 3);
/// assert_eq!(pos.row, 2);
/// assert_eq!(pos.col, 3);
/// assert_eq!(pos.step(pairlink::Direction::Left), Position::new(2, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns the neighbouring position one cell away in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }

    /// Whether both positions share a row or a column.
    pub fn is_aligned_with(self, other: Position) -> bool {
        self.row == other.row || self.col == other.col
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.row + other.row, self.col + other.col)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.row - other.row, self.col - other.col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four axis directions a connecting path can travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::{Direction, Position};
    ///
    /// assert_eq!(Direction::Up.to_delta(), Position::new(-1, 0));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Left => Position::new(0, -1),
            Direction::Right => Position::new(0, 1),
            Direction::Up => Position::new(-1, 0),
            Direction::Down => Position::new(1, 0),
        }
    }

    /// All four directions in path-search scan order: left, right, up, down.
    pub fn scan_order() -> [Direction; 4] {
        [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ]
    }
}

/// Unique identifier for tile entities.
pub type TileId = Uuid;

/// Creates a new unique tile ID.
pub fn new_tile_id() -> TileId {
    Uuid::new_v4()
}
