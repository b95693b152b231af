//! # Board Manager
//!
//! Owns the grid and every tile entity on it.
//!
//! The board manager is the only writer of the grid. It performs matches, detects
//! deadlock, reshuffles and manages timed power tiles. Selection state is not kept here:
//! each player tracks its own selected tile and passes both tiles into
//! [`BoardManager::try_match`].

use crate::config::MAX_SHUFFLE_ATTEMPTS;
use crate::generation::utils::{create_rng, grid_is_solvable};
use crate::{
    BoardGenerator, BoardLayout, GenerationConfig, Generator, Grid, PairlinkError,
    PairlinkResult, Path, PathFinder, Position, Tile, TileId, ToolKind, TypeId, EMPTY,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

/// Result of trying to match two tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Both tiles were removed; the path shows how they connected
    Matched(Path),
    /// The tiles differ in type, cannot be matched or have no connecting path
    Rejected,
    /// Both arguments name the same tile
    AlreadySelected,
}

/// Board state: the grid, tile entities and the most recent connecting path.
///
/// Not thread-safe; owned by a single controller that serializes calls from all players.
#[derive(Debug, Clone)]
pub struct BoardManager {
    grid: Grid,
    tiles: HashMap<TileId, Tile>,
    position_index: HashMap<Position, TileId>,
    last_path: Option<Path>,
    layout: BoardLayout,
    rng: StdRng,
}

impl BoardManager {
    /// Generates a new board.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::{BoardManager, GenerationConfig};
    ///
    /// let board = BoardManager::generate(&GenerationConfig::for_testing(42)).unwrap();
    /// assert_eq!(board.tile_count(), 24);
    /// assert!(board.is_solvable());
    /// ```
    pub fn generate(config: &GenerationConfig) -> PairlinkResult<Self> {
        let mut rng = create_rng(config);
        let generator = BoardGenerator::new();
        let grid = generator.generate(config, &mut rng)?;
        debug!("Board built by the {} generator", generator.generator_type());
        Ok(Self::with_rng(grid, rng))
    }

    /// Wraps an existing grid, creating one tile per occupied cell.
    pub fn from_grid(grid: Grid) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    /// Wraps an existing grid with a seeded random source for shuffles and spawns.
    pub fn from_grid_seeded(grid: Grid, seed: u64) -> Self {
        Self::with_rng(grid, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, rng: StdRng) -> Self {
        let layout = BoardLayout::for_board(grid.rows(), grid.cols());
        let mut board = Self {
            grid,
            tiles: HashMap::new(),
            position_index: HashMap::new(),
            last_path: None,
            layout,
            rng,
        };
        board.rebuild_tiles();
        board
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Gets a tile by id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Gets the tile at a position, regular or power.
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.position_index
            .get(&position)
            .and_then(|id| self.tiles.get(id))
    }

    /// All live tiles, in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Live power tiles.
    pub fn power_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values().filter(|tile| tile.is_power())
    }

    /// Number of live regular tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.values().filter(|tile| !tile.is_power()).count()
    }

    /// Tries to match two tiles.
    ///
    /// On success both grid cells become empty, both tiles are removed and the connecting
    /// path is remembered for [`BoardManager::last_path_points`]. A missing path is an
    /// ordinary `Rejected`, never an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::{BoardManager, Grid, MatchOutcome, Position};
    ///
    /// let grid = Grid::from_rows(vec![vec![2, -1, 2]]).unwrap();
    /// let mut board = BoardManager::from_grid(grid);
    /// let a = board.tile_at(Position::new(0, 0)).unwrap().id;
    /// let b = board.tile_at(Position::new(0, 2)).unwrap().id;
    ///
    /// assert_eq!(board.try_match(a, a).unwrap(), MatchOutcome::AlreadySelected);
    /// assert!(matches!(board.try_match(a, b).unwrap(), MatchOutcome::Matched(_)));
    /// assert_eq!(board.tile_count(), 0);
    /// ```
    pub fn try_match(&mut self, a: TileId, b: TileId) -> PairlinkResult<MatchOutcome> {
        if a == b {
            return Ok(MatchOutcome::AlreadySelected);
        }

        let (from, to) = {
            let tile_a = self.require_tile(a)?;
            let tile_b = self.require_tile(b)?;
            if !tile_a.is_matchable()
                || !tile_b.is_matchable()
                || tile_a.tile_type != tile_b.tile_type
            {
                return Ok(MatchOutcome::Rejected);
            }
            (tile_a.position, tile_b.position)
        };

        let path = match PathFinder::new(&self.grid).find_path(from, to)? {
            Some(path) => path,
            None => {
                debug!("No path between {} and {}", from, to);
                return Ok(MatchOutcome::Rejected);
            }
        };

        self.remove_tile(a)?;
        self.remove_tile(b)?;
        debug!(
            "Matched {} and {} with {} turn(s), {} tiles left",
            from,
            to,
            path.turns(),
            self.tile_count()
        );
        self.last_path = Some(path.clone());
        Ok(MatchOutcome::Matched(path))
    }

    /// Whether at least one same-type pair of live tiles connects.
    ///
    /// A board without tiles is not solvable.
    pub fn is_solvable(&self) -> bool {
        self.first_connectable().is_some()
    }

    /// Returns a connectable pair of live tiles, if any.
    pub fn find_hint_pair(&self) -> Option<(Tile, Tile)> {
        let (a, b) = self.first_connectable()?;
        let tile_a = self.tile_at(a)?.clone();
        let tile_b = self.tile_at(b)?.clone();
        Some((tile_a, tile_b))
    }

    /// Randomly permutes tile types over every cell not covered by a power tile.
    ///
    /// The multiset of types, the tile count, tile ids and power tile positions are kept.
    /// Up to [`MAX_SHUFFLE_ATTEMPTS`] permutations are drawn until one is solvable; if none
    /// is, the last one stays and the deadlock surfaces through [`BoardManager::is_solvable`].
    pub fn shuffle(&mut self) {
        let covered: HashSet<Position> = self.power_tiles().map(|tile| tile.position).collect();
        let cols = self.grid.cols();
        let indices: Vec<usize> = self
            .grid
            .positions()
            .filter(|pos| !covered.contains(pos))
            .map(|pos| pos.row as usize * cols + pos.col as usize)
            .collect();
        let mut values: Vec<TypeId> = indices.iter().map(|&i| self.grid.cells()[i]).collect();
        let has_tiles = values.iter().any(|&value| value != EMPTY);

        let mut attempt = 0;
        loop {
            attempt += 1;
            values.shuffle(&mut self.rng);
            let cells = self.grid.cells_mut();
            for (&index, &value) in indices.iter().zip(&values) {
                cells[index] = value;
            }
            if !has_tiles || grid_is_solvable(&self.grid) {
                break;
            }
            if attempt >= MAX_SHUFFLE_ATTEMPTS {
                warn!(
                    "Shuffle found no solvable layout in {} attempts; board is deadlocked",
                    attempt
                );
                break;
            }
        }

        self.reassign_regular_tiles();
        self.last_path = None;
        info!("Shuffled {} tiles in {} attempt(s)", self.tile_count(), attempt);
    }

    /// The path of the most recent successful match.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_ref()
    }

    /// Pixel-space points of the most recent path, for drawing the connecting line.
    pub fn last_path_points(&self) -> Vec<(f64, f64)> {
        self.last_path
            .as_ref()
            .map(|path| self.layout.path_points(path))
            .unwrap_or_default()
    }

    /// Removes a tile. Regular tiles free their grid cell.
    pub fn remove_tile(&mut self, id: TileId) -> PairlinkResult<Tile> {
        let tile = self.tiles.remove(&id).ok_or_else(|| {
            PairlinkError::InvalidAction(format!("tile {} is not on the board", id))
        })?;
        if self.position_index.get(&tile.position) == Some(&id) {
            self.position_index.remove(&tile.position);
        }
        if !tile.is_power() {
            self.grid.set(tile.position.row, tile.position.col, EMPTY)?;
        }
        Ok(tile)
    }

    /// Sets the selection highlight flag on a tile.
    pub fn set_active(&mut self, id: TileId, active: bool) -> PairlinkResult<()> {
        self.require_tile_mut(id)?.active = active;
        Ok(())
    }

    /// Sets the hint highlight flag on a tile.
    pub fn set_hinted(&mut self, id: TileId, hinted: bool) -> PairlinkResult<()> {
        self.require_tile_mut(id)?.hinted = hinted;
        Ok(())
    }

    /// Clears the hint flag on every tile.
    pub fn clear_hints(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.hinted = false;
        }
    }

    /// Places a power tile on a random free cell of the padded grid.
    ///
    /// Free means empty and not holding another tile; the border counts. Returns `None` for
    /// [`ToolKind::None`] or when no cell is free.
    pub fn spawn_power_tile(&mut self, kind: ToolKind, now: u64, lifetime: u64) -> Option<TileId> {
        if !kind.is_power() {
            return None;
        }
        let free: Vec<Position> = self
            .grid
            .padded_view()
            .empty_positions()
            .filter(|pos| !self.position_index.contains_key(pos))
            .collect();
        if free.is_empty() {
            return None;
        }

        let position = free[self.rng.gen_range(0..free.len())];
        let tile = Tile::power(kind, position, now + lifetime);
        let id = tile.id;
        self.position_index.insert(position, id);
        self.tiles.insert(id, tile);
        debug!("Spawned {:?} power tile at {}", kind, position);
        Some(id)
    }

    /// Removes every power tile whose lifetime has run out at `now`.
    pub fn expire_power_tiles(&mut self, now: u64) -> Vec<TileId> {
        let expired: Vec<TileId> = self
            .power_tiles()
            .filter(|tile| tile.is_expired(now))
            .map(|tile| tile.id)
            .collect();
        for &id in &expired {
            if let Some(tile) = self.tiles.remove(&id) {
                self.position_index.remove(&tile.position);
            }
        }
        expired
    }

    /// Replaces the grid, e.g. after loading a save. All tiles get fresh ids and power tiles
    /// are dropped.
    pub fn restore_grid(&mut self, grid: Grid) {
        if grid.rows() != self.layout.rows() || grid.cols() != self.layout.cols() {
            self.layout = self.layout.resized(grid.rows(), grid.cols());
        }
        self.grid = grid;
        self.last_path = None;
        self.rebuild_tiles();
        info!(
            "Restored {}x{} board with {} tiles",
            self.grid.rows(),
            self.grid.cols(),
            self.tile_count()
        );
    }

    fn first_connectable(&self) -> Option<(Position, Position)> {
        let mut cells: Vec<(Position, TypeId)> = self
            .tiles
            .values()
            .filter(|tile| tile.is_matchable())
            .map(|tile| (tile.position, tile.tile_type))
            .collect();
        cells.sort();
        PathFinder::new(&self.grid)
            .first_pair(&cells)
            .map(|(a, b, _)| (a, b))
    }

    fn rebuild_tiles(&mut self) {
        self.tiles.clear();
        self.position_index.clear();
        let tiles: Vec<Tile> = self
            .grid
            .occupied()
            .map(|(pos, tile_type)| Tile::new(tile_type, pos))
            .collect();
        for tile in tiles {
            self.position_index.insert(tile.position, tile.id);
            self.tiles.insert(tile.id, tile);
        }
    }

    /// Moves the existing regular tile entities onto the occupied cells after a shuffle.
    fn reassign_regular_tiles(&mut self) {
        let mut ids: Vec<TileId> = self
            .tiles
            .values()
            .filter(|tile| !tile.is_power())
            .map(|tile| tile.id)
            .collect();
        ids.sort();
        ids.shuffle(&mut self.rng);

        for id in &ids {
            if let Some(tile) = self.tiles.get(id) {
                self.position_index.remove(&tile.position);
            }
        }

        let occupied: Vec<(Position, TypeId)> = self.grid.occupied().collect();
        for (id, (pos, tile_type)) in ids.into_iter().zip(occupied) {
            if let Some(tile) = self.tiles.get_mut(&id) {
                tile.position = pos;
                tile.tile_type = tile_type;
            }
            self.position_index.insert(pos, id);
        }
    }

    fn require_tile(&self, id: TileId) -> PairlinkResult<&Tile> {
        self.tiles
            .get(&id)
            .ok_or_else(|| PairlinkError::InvalidAction(format!("tile {} is not on the board", id)))
    }

    fn require_tile_mut(&mut self, id: TileId) -> PairlinkResult<&mut Tile> {
        self.tiles
            .get_mut(&id)
            .ok_or_else(|| PairlinkError::InvalidAction(format!("tile {} is not on the board", id)))
    }
}
