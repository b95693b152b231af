//! # Path Finding
//!
//! Two-turn connectivity search between tiles.
//!
//! Two cells connect when an orthogonal path with at most two 90° turns joins them and
//! every cell strictly between the endpoints is empty. The search runs on a padded copy of
//! the grid, so paths can leave the board by one cell and run along its edge.
//!
//! Strategies are tried in a fixed order and the first success wins, which decides the path
//! that gets drawn when several exist:
//!
//! 1. straight line
//! 2. one turn, via corner `(r1, c2)` and then corner `(r2, c1)`
//! 3. two turns: walk away from the first endpoint left, right, up, then down, nearest cell
//!    first, and try a one-turn connection from every empty cell reached

use crate::{Direction, Grid, PaddedGrid, PairlinkResult, Position, TypeId, EMPTY};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A connecting path: the endpoints plus every turning point, in travel order.
///
/// Holds between 2 (straight) and 4 (two turns) points. Coordinates are logical grid
/// coordinates; points on the padded border use `-1` or `rows`/`cols`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Position>,
}

impl Path {
    fn new(points: Vec<Position>) -> Self {
        Self { points }
    }

    /// Turning points including both endpoints.
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Position> {
        self.points
    }

    pub fn start(&self) -> Position {
        self.points[0]
    }

    pub fn end(&self) -> Position {
        self.points[self.points.len() - 1]
    }

    /// Number of 90° turns along the path.
    pub fn turns(&self) -> usize {
        self.points.len().saturating_sub(2)
    }

    /// Every cell the path passes through, endpoints included.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::{Grid, PathFinder, Position};
    ///
    /// let grid = Grid::from_rows(vec![vec![2, -1, 2]]).unwrap();
    /// let path = PathFinder::new(&grid)
    ///     .connect(Position::new(0, 0), Position::new(0, 2))
    ///     .unwrap();
    /// assert_eq!(path.cells().len(), 3);
    /// ```
    pub fn cells(&self) -> Vec<Position> {
        let mut cells = vec![self.start()];
        for pair in self.points.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let step = Position::new((to.row - from.row).signum(), (to.col - from.col).signum());
            let mut current = from;
            while current != to {
                current = current + step;
                cells.push(current);
            }
        }
        cells
    }
}

/// Connectivity search over a snapshot of a grid.
///
/// The snapshot is taken at construction; build a new finder after the grid changes.
/// One finder can answer any number of queries, which is how deadlock detection checks
/// every candidate pair without re-copying the board.
#[derive(Debug, Clone)]
pub struct PathFinder {
    padded: PaddedGrid,
}

impl PathFinder {
    /// Snapshots `grid` into a padded view.
    pub fn new(grid: &Grid) -> Self {
        Self {
            padded: grid.padded_view(),
        }
    }

    /// Checked search: both endpoints must lie inside the logical grid.
    ///
    /// Returns `Ok(None)` when the cells do not connect, which is an ordinary outcome.
    pub fn find_path(&self, from: Position, to: Position) -> PairlinkResult<Option<Path>> {
        for pos in [from, to] {
            if !self.in_grid(pos) {
                return Err(crate::PairlinkError::OutOfBounds {
                    row: pos.row,
                    col: pos.col,
                    rows: self.padded.rows(),
                    cols: self.padded.cols(),
                });
            }
        }
        Ok(self.connect(from, to))
    }

    /// Searches for a path between two occupied cells of the same type.
    ///
    /// Identical endpoints, empty endpoints, endpoints outside the grid and type mismatches
    /// fail without searching.
    pub fn connect(&self, from: Position, to: Position) -> Option<Path> {
        if from == to || !self.in_grid(from) || !self.in_grid(to) {
            return None;
        }
        let from_type = self.padded.get(from)?;
        let to_type = self.padded.get(to)?;
        if from_type == EMPTY || from_type != to_type {
            return None;
        }

        let query = Query {
            grid: &self.padded,
            from,
            to,
        };

        if query.straight(from, to) {
            debug!("{} -> {} connects straight", from, to);
            return Some(Path::new(vec![from, to]));
        }
        if let Some(points) = query.one_turn(from, to) {
            debug!("{} -> {} connects with one turn", from, to);
            return Some(Path::new(points));
        }
        if let Some(points) = query.two_turn() {
            debug!("{} -> {} connects with two turns", from, to);
            return Some(Path::new(points));
        }
        None
    }

    /// Whether the two cells connect.
    pub fn can_connect(&self, from: Position, to: Position) -> bool {
        self.connect(from, to).is_some()
    }

    /// Finds the first connectable same-type pair among `cells`.
    ///
    /// Cells are grouped by type (ascending type id, input order within a type) and every
    /// pair inside a group is tried until one connects.
    pub fn first_pair(&self, cells: &[(Position, TypeId)]) -> Option<(Position, Position, Path)> {
        let mut groups: BTreeMap<TypeId, Vec<Position>> = BTreeMap::new();
        for &(pos, tile_type) in cells {
            if tile_type != EMPTY {
                groups.entry(tile_type).or_default().push(pos);
            }
        }

        for positions in groups.values() {
            for (i, &a) in positions.iter().enumerate() {
                for &b in &positions[i + 1..] {
                    if let Some(path) = self.connect(a, b) {
                        return Some((a, b, path));
                    }
                }
            }
        }
        None
    }

    fn in_grid(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.padded.rows()
            && (pos.col as usize) < self.padded.cols()
    }
}

/// One search; both endpoints count as empty so they never block their own path.
struct Query<'a> {
    grid: &'a PaddedGrid,
    from: Position,
    to: Position,
}

impl Query<'_> {
    fn passable(&self, pos: Position) -> bool {
        pos == self.from || pos == self.to || self.grid.is_empty(pos)
    }

    /// All cells strictly between `a` and `b` are passable; `a` and `b` must be aligned.
    fn straight(&self, a: Position, b: Position) -> bool {
        if a.row == b.row {
            let (lo, hi) = (a.col.min(b.col), a.col.max(b.col));
            (lo + 1..hi).all(|col| self.passable(Position::new(a.row, col)))
        } else if a.col == b.col {
            let (lo, hi) = (a.row.min(b.row), a.row.max(b.row));
            (lo + 1..hi).all(|row| self.passable(Position::new(row, a.col)))
        } else {
            false
        }
    }

    fn one_turn(&self, a: Position, b: Position) -> Option<Vec<Position>> {
        let corners = [Position::new(a.row, b.col), Position::new(b.row, a.col)];
        corners
            .into_iter()
            .find(|&corner| {
                self.passable(corner) && self.straight(a, corner) && self.straight(corner, b)
            })
            .map(|corner| vec![a, corner, b])
    }

    fn two_turn(&self) -> Option<Vec<Position>> {
        for direction in Direction::scan_order() {
            let mut mid = self.from.step(direction);
            while self.passable(mid) {
                if let Some(rest) = self.one_turn(mid, self.to) {
                    let mut points = Vec::with_capacity(rest.len() + 1);
                    points.push(self.from);
                    points.extend(rest);
                    return Some(points);
                }
                mid = mid.step(direction);
            }
        }
        None
    }
}
