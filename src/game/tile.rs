//! # Tiles
//!
//! Tile entities placed on the board, including timed power tiles.

use crate::{new_tile_id, Position, TileId, TypeId, EMPTY};
use serde::{Deserialize, Serialize};

/// Kind of a tile. Anything other than [`ToolKind::None`] is a power tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Regular matchable tile
    None,
    /// Adds time to the session countdown
    AddTime,
    /// Reshuffles the board
    Shuffle,
    /// Highlights a connectable pair
    Hint,
}

impl ToolKind {
    /// The three power tile kinds.
    pub fn power_kinds() -> [ToolKind; 3] {
        [ToolKind::AddTime, ToolKind::Shuffle, ToolKind::Hint]
    }

    pub fn is_power(self) -> bool {
        self != ToolKind::None
    }
}

/// A placed tile.
///
/// Regular tiles mirror a grid cell. Power tiles sit on an empty cell (possibly on the
/// padded border), never occupy the grid and expire after a fixed lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub tile_type: TypeId,
    pub position: Position,
    pub tool: ToolKind,
    /// Selected by a player
    pub active: bool,
    /// Part of the currently shown hint pair
    pub hinted: bool,
    /// Session clock second at which a power tile disappears
    pub expires_at: Option<u64>,
}

impl Tile {
    /// Creates a regular tile.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::{Position, Tile};
    ///
    /// let tile = Tile::new(3, Position::new(1, 2));
    /// assert_eq!(tile.tile_type, 3);
    /// assert!(tile.is_matchable());
    /// ```
    pub fn new(tile_type: TypeId, position: Position) -> Self {
        Self {
            id: new_tile_id(),
            tile_type,
            position,
            tool: ToolKind::None,
            active: false,
            hinted: false,
            expires_at: None,
        }
    }

    /// Creates a power tile that expires at `expires_at`.
    pub fn power(tool: ToolKind, position: Position, expires_at: u64) -> Self {
        Self {
            id: new_tile_id(),
            tile_type: EMPTY,
            position,
            tool,
            active: false,
            hinted: false,
            expires_at: Some(expires_at),
        }
    }

    pub fn is_power(&self) -> bool {
        self.tool.is_power()
    }

    /// Whether this tile can take part in a pair match.
    pub fn is_matchable(&self) -> bool {
        !self.is_power() && self.tile_type != EMPTY
    }

    /// Whether a power tile's lifetime has run out at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}
