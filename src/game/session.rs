//! # Session
//!
//! A timed game on one board shared by one or two players.
//!
//! Each player owns a selection slot. Activating a tile runs the per-player selection state
//! machine (`Idle -> Selected(tile) -> Idle` on a match, or `Selected(other)` on a reject),
//! applies power tile effects and re-checks the board for deadlock. The countdown, power
//! tile spawns and hint expiry advance through [`Session::tick`].

use crate::config::{
    ADD_TIME_BONUS_SECS, HINT_DURATION_SECS, INITIAL_COUNTDOWN_SECS, MATCH_SCORE, MAX_PLAYERS,
    POWER_TILE_LIFETIME_SECS, POWER_TILE_SPAWN_INTERVAL_SECS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::generation::utils::create_rng;
use crate::{
    load_from_file, save_to_file, BoardManager, GenerationConfig, MatchOutcome, PairlinkError,
    PairlinkResult, Path, SaveState, TileId, ToolKind,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Timing and scoring rules of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of players sharing the board
    pub players: usize,
    pub initial_countdown_secs: i32,
    pub match_score: i32,
    pub add_time_bonus_secs: i32,
    pub power_tile_lifetime_secs: u64,
    pub power_tile_spawn_interval_secs: u64,
    pub hint_duration_secs: u64,
    /// Whether power tiles appear on their own while the clock runs
    pub spawn_power_tiles: bool,
}

impl SessionConfig {
    /// Creates the default rules for `players` players.
    pub fn new(players: usize) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Single player rules without automatic power tile spawns.
    pub fn for_testing() -> Self {
        Self {
            spawn_power_tiles: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PairlinkResult<()> {
        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(PairlinkError::InvalidState(format!(
                "a session needs 1 to {} players, got {}",
                MAX_PLAYERS, self.players
            )));
        }
        if self.initial_countdown_secs <= 0 {
            return Err(PairlinkError::InvalidState(format!(
                "countdown must be positive, got {}",
                self.initial_countdown_secs
            )));
        }
        if self.spawn_power_tiles && self.power_tile_spawn_interval_secs == 0 {
            return Err(PairlinkError::InvalidState(
                "power tile spawn interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            players: 1,
            initial_countdown_secs: INITIAL_COUNTDOWN_SECS,
            match_score: MATCH_SCORE,
            add_time_bonus_secs: ADD_TIME_BONUS_SECS,
            power_tile_lifetime_secs: POWER_TILE_LIFETIME_SECS,
            power_tile_spawn_interval_secs: POWER_TILE_SPAWN_INTERVAL_SECS,
            hint_duration_secs: HINT_DURATION_SECS,
            spawn_power_tiles: true,
        }
    }
}

/// Complete game configuration, loadable from JSON.
///
/// Missing fields fall back to their defaults, so a file may contain only the values it
/// changes:
///
/// ```json
/// { "generation": { "rows": 6, "cols": 8, "mode": "ingredient" }, "session": { "players": 2 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub generation: GenerationConfig,
    pub session: SessionConfig,
}

impl GameConfig {
    /// Reads a configuration file.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> PairlinkResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&content)?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> PairlinkResult<()> {
        self.generation.validate()?;
        self.session.validate()
    }
}

/// A player's current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionSlot {
    #[default]
    Idle,
    Selected(TileId),
}

/// An independent player with its own selection, score and on-screen position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    /// Pixel position of the player's character
    pub position: (f64, f64),
    pub score: i32,
    pub selection: SelectionSlot,
}

impl Actor {
    pub fn new(name: impl Into<String>, position: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            position,
            score: 0,
            selection: SelectionSlot::Idle,
        }
    }

    /// The selected tile, if any.
    pub fn selected(&self) -> Option<TileId> {
        match self.selection {
            SelectionSlot::Idle => None,
            SelectionSlot::Selected(id) => Some(id),
        }
    }
}

/// What a single activation did.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationOutcome {
    /// The tile became the player's selection
    Selected,
    /// The tile was already selected by this player
    AlreadySelected,
    /// The selection and the tile were removed as a pair
    Matched {
        path: Path,
        /// Pixel points of the path for drawing the link
        points: Vec<(f64, f64)>,
    },
    /// The pair was rejected; the new tile replaced the old selection
    Reselected,
    /// A power tile was consumed
    ToolUsed(ToolKind),
}

/// Overall state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Playing,
    /// The countdown reached zero
    TimeUp,
    /// Tiles remain but no pair connects
    Deadlocked,
    /// Every regular tile was removed
    Cleared,
}

impl SessionStatus {
    pub fn is_over(self) -> bool {
        self != SessionStatus::Playing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HintMarker {
    pair: (TileId, TileId),
    expires_at: u64,
}

/// A running game.
#[derive(Debug, Clone)]
pub struct Session {
    board: BoardManager,
    actors: Vec<Actor>,
    config: SessionConfig,
    remaining: i32,
    elapsed: u64,
    next_spawn_at: u64,
    paused: bool,
    status: SessionStatus,
    hint: Option<HintMarker>,
    rng: StdRng,
}

impl Session {
    /// Generates a board and starts a session on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::{GameConfig, GenerationConfig, Session, SessionStatus};
    ///
    /// let config = GameConfig {
    ///     generation: GenerationConfig::for_testing(3),
    ///     ..GameConfig::default()
    /// };
    /// let session = Session::new(&config).unwrap();
    /// assert_eq!(session.status(), SessionStatus::Playing);
    /// assert_eq!(session.remaining_time(), 120);
    /// ```
    pub fn new(config: &GameConfig) -> PairlinkResult<Self> {
        config.validate()?;
        let board = BoardManager::generate(&config.generation)?;
        let mut session = Self::with_board(board, config.session.clone())?;
        session.rng = create_rng(&config.generation);
        Ok(session)
    }

    /// Starts a session on an existing board.
    pub fn with_board(board: BoardManager, config: SessionConfig) -> PairlinkResult<Self> {
        config.validate()?;
        let actors = (0..config.players)
            .map(|i| {
                Actor::new(
                    format!("Player {}", i + 1),
                    default_actor_position(i, config.players),
                )
            })
            .collect();

        let mut session = Self {
            board,
            actors,
            remaining: config.initial_countdown_secs,
            elapsed: 0,
            next_spawn_at: config.power_tile_spawn_interval_secs,
            paused: false,
            status: SessionStatus::Playing,
            hint: None,
            rng: StdRng::from_entropy(),
            config,
        };
        session.refresh_status();
        info!(
            "Session started: {} player(s), {} tiles, {}s on the clock",
            session.actors.len(),
            session.board.tile_count(),
            session.remaining
        );
        Ok(session)
    }

    /// Seeds the random source used for power tile kinds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn board(&self) -> &BoardManager {
        &self.board
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, index: usize) -> Option<&Actor> {
        self.actors.get(index)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds left on the countdown.
    pub fn remaining_time(&self) -> i32 {
        self.remaining
    }

    /// Seconds the clock has run.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// The pair currently highlighted by a hint.
    pub fn hint(&self) -> Option<(TileId, TileId)> {
        self.hint.map(|marker| marker.pair)
    }

    /// Moves a player's character.
    pub fn set_actor_position(&mut self, index: usize, position: (f64, f64)) -> PairlinkResult<()> {
        self.actor_mut(index)?.position = position;
        Ok(())
    }

    /// Handles a player touching a tile.
    pub fn activate(&mut self, index: usize, tile_id: TileId) -> PairlinkResult<ActivationOutcome> {
        self.ensure_running()?;
        self.actor_mut(index)?;
        let tile = self.board.tile(tile_id).cloned().ok_or_else(|| {
            PairlinkError::InvalidAction(format!("tile {} is not on the board", tile_id))
        })?;

        let outcome = if tile.is_power() {
            self.board.remove_tile(tile_id)?;
            self.apply_tool(tile.tool)?;
            info!("{} used a {:?} tile", self.actors[index].name, tile.tool);
            ActivationOutcome::ToolUsed(tile.tool)
        } else {
            self.activate_regular(index, tile_id)?
        };

        // Only a match or a reshuffle changes which pairs connect.
        if matches!(
            outcome,
            ActivationOutcome::Matched { .. } | ActivationOutcome::ToolUsed(ToolKind::Shuffle)
        ) {
            self.refresh_status();
        }
        Ok(outcome)
    }

    fn activate_regular(&mut self, index: usize, tile_id: TileId) -> PairlinkResult<ActivationOutcome> {
        let previous = match self.actors[index].selected() {
            Some(previous) if self.board.tile(previous).is_some() => previous,
            _ => {
                self.select(index, tile_id)?;
                return Ok(ActivationOutcome::Selected);
            }
        };

        match self.board.try_match(previous, tile_id)? {
            MatchOutcome::AlreadySelected => Ok(ActivationOutcome::AlreadySelected),
            MatchOutcome::Matched(path) => {
                let actor = &mut self.actors[index];
                actor.score += self.config.match_score;
                actor.selection = SelectionSlot::Idle;
                debug!("{} scored, now at {}", actor.name, actor.score);
                self.drop_stale_references();
                let points = self.board.layout().path_points(&path);
                Ok(ActivationOutcome::Matched { path, points })
            }
            MatchOutcome::Rejected => {
                if !self.is_selected_by_other(index, previous) {
                    self.board.set_active(previous, false)?;
                }
                self.select(index, tile_id)?;
                Ok(ActivationOutcome::Reselected)
            }
        }
    }

    fn is_selected_by_other(&self, index: usize, tile_id: TileId) -> bool {
        self.actors
            .iter()
            .enumerate()
            .any(|(i, actor)| i != index && actor.selected() == Some(tile_id))
    }

    fn select(&mut self, index: usize, tile_id: TileId) -> PairlinkResult<()> {
        self.board.set_active(tile_id, true)?;
        self.actors[index].selection = SelectionSlot::Selected(tile_id);
        Ok(())
    }

    fn apply_tool(&mut self, tool: ToolKind) -> PairlinkResult<()> {
        match tool {
            ToolKind::AddTime => {
                self.remaining += self.config.add_time_bonus_secs;
            }
            ToolKind::Shuffle => {
                self.board.shuffle();
                self.clear_selections()?;
                self.clear_hint();
            }
            ToolKind::Hint => {
                self.clear_hint();
                if let Some((a, b)) = self.board.find_hint_pair() {
                    self.board.set_hinted(a.id, true)?;
                    self.board.set_hinted(b.id, true)?;
                    self.hint = Some(HintMarker {
                        pair: (a.id, b.id),
                        expires_at: self.elapsed + self.config.hint_duration_secs,
                    });
                }
            }
            ToolKind::None => {
                return Err(PairlinkError::InvalidAction(
                    "regular tiles carry no tool".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Pauses or resumes the clock. Returns whether the session is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        info!("Session {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Advances the clock by `secs` seconds.
    ///
    /// Does nothing while paused or once the game is over.
    pub fn tick(&mut self, secs: u64) -> SessionStatus {
        for _ in 0..secs {
            if self.paused || self.status.is_over() {
                break;
            }
            self.elapsed += 1;
            self.remaining -= 1;

            let expired = self.board.expire_power_tiles(self.elapsed);
            if !expired.is_empty() {
                debug!("{} power tile(s) expired", expired.len());
            }
            if self
                .hint
                .map(|marker| self.elapsed >= marker.expires_at)
                .unwrap_or(false)
            {
                self.clear_hint();
            }
            if self.config.spawn_power_tiles && self.elapsed >= self.next_spawn_at {
                self.next_spawn_at = self.elapsed + self.config.power_tile_spawn_interval_secs;
                self.spawn_random_power_tile();
            }

            if self.remaining <= 0 {
                self.remaining = 0;
                self.status = SessionStatus::TimeUp;
                info!("Time is up");
            }
        }
        self.status
    }

    fn spawn_random_power_tile(&mut self) -> Option<TileId> {
        let kind = *ToolKind::power_kinds().choose(&mut self.rng)?;
        self.board
            .spawn_power_tile(kind, self.elapsed, self.config.power_tile_lifetime_secs)
    }

    /// Captures the board, player positions and scores, and the countdown.
    pub fn snapshot(&self) -> SaveState {
        SaveState {
            grid: self.board.grid().clone(),
            positions: self.actors.iter().map(|a| a.position).collect(),
            scores: self.actors.iter().map(|a| a.score).collect(),
            remaining_time: self.remaining,
        }
    }

    /// Replaces the session state with a snapshot.
    ///
    /// The snapshot must hold one record per current player; otherwise nothing changes and
    /// [`PairlinkError::ActorCountMismatch`] is returned. Selections, hints and power tiles
    /// are cleared and the session resumes unpaused.
    pub fn restore(&mut self, state: SaveState) -> PairlinkResult<()> {
        let active = self.actors.len();
        if state.positions.len() != active || state.scores.len() != active {
            let saved = state.positions.len();
            warn!(
                "Refusing to load a {}-player save into a {}-player game",
                saved, active
            );
            return Err(PairlinkError::ActorCountMismatch { saved, active });
        }

        self.board.restore_grid(state.grid);
        for ((actor, position), score) in self
            .actors
            .iter_mut()
            .zip(state.positions)
            .zip(state.scores)
        {
            actor.position = position;
            actor.score = score;
            actor.selection = SelectionSlot::Idle;
        }
        self.remaining = state.remaining_time;
        self.next_spawn_at = self.elapsed + self.config.power_tile_spawn_interval_secs;
        self.hint = None;
        self.paused = false;
        self.status = SessionStatus::Playing;
        if self.remaining <= 0 {
            self.remaining = 0;
            self.status = SessionStatus::TimeUp;
        } else {
            self.refresh_status();
        }
        Ok(())
    }

    /// Saves the session; see [`save_to_file`].
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> PairlinkResult<PathBuf> {
        save_to_file(&self.snapshot(), path)
    }

    /// Loads a save file into this session; see [`Session::restore`].
    pub fn load(&mut self, path: impl AsRef<std::path::Path>) -> PairlinkResult<()> {
        let state = load_from_file(path)?;
        self.restore(state)
    }

    fn refresh_status(&mut self) {
        if self.status.is_over() {
            return;
        }
        if self.board.tile_count() == 0 {
            self.status = SessionStatus::Cleared;
            info!("Board cleared with {}s left", self.remaining);
        } else if !self.board.is_solvable() {
            self.status = SessionStatus::Deadlocked;
            info!("No pair can be connected; game over");
        }
    }

    fn ensure_running(&self) -> PairlinkResult<()> {
        if self.status.is_over() {
            return Err(PairlinkError::InvalidAction(format!(
                "the game is over ({:?})",
                self.status
            )));
        }
        if self.paused {
            return Err(PairlinkError::InvalidAction("the game is paused".to_string()));
        }
        Ok(())
    }

    fn actor_mut(&mut self, index: usize) -> PairlinkResult<&mut Actor> {
        let count = self.actors.len();
        self.actors.get_mut(index).ok_or_else(|| {
            PairlinkError::InvalidAction(format!("no player {} in a {}-player game", index, count))
        })
    }

    /// Resets selections that point at tiles no longer on the board.
    fn drop_stale_references(&mut self) {
        for actor in &mut self.actors {
            if let Some(id) = actor.selected() {
                if self.board.tile(id).is_none() {
                    actor.selection = SelectionSlot::Idle;
                }
            }
        }
        if let Some(marker) = self.hint {
            let (a, b) = marker.pair;
            if self.board.tile(a).is_none() || self.board.tile(b).is_none() {
                self.clear_hint();
            }
        }
    }

    fn clear_selections(&mut self) -> PairlinkResult<()> {
        for actor in &mut self.actors {
            if let Some(id) = actor.selected() {
                if self.board.tile(id).is_some() {
                    self.board.set_active(id, false)?;
                }
            }
            actor.selection = SelectionSlot::Idle;
        }
        Ok(())
    }

    fn clear_hint(&mut self) {
        self.board.clear_hints();
        self.hint = None;
    }
}

fn default_actor_position(index: usize, players: usize) -> (f64, f64) {
    let x = VIEWPORT_WIDTH * (index + 1) as f64 / (players + 1) as f64;
    (x, VIEWPORT_HEIGHT - 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grid, Position};

    fn session(rows: Vec<Vec<i32>>, players: usize) -> Session {
        let board = BoardManager::from_grid_seeded(Grid::from_rows(rows).unwrap(), 11);
        let config = SessionConfig {
            players,
            ..SessionConfig::for_testing()
        };
        Session::with_board(board, config).unwrap().with_seed(5)
    }

    fn id_at(session: &Session, row: i32, col: i32) -> TileId {
        session.board().tile_at(Position::new(row, col)).unwrap().id
    }

    #[test]
    fn test_select_then_match_scores() {
        let mut s = session(vec![vec![1, -1, 1], vec![2, -1, 2]], 1);
        let a = id_at(&s, 0, 0);
        let b = id_at(&s, 0, 2);

        assert_eq!(s.activate(0, a).unwrap(), ActivationOutcome::Selected);
        assert!(s.board().tile(a).unwrap().active);
        assert_eq!(s.activate(0, a).unwrap(), ActivationOutcome::AlreadySelected);

        match s.activate(0, b).unwrap() {
            ActivationOutcome::Matched { path, points } => {
                assert_eq!(path.points().len(), 2);
                assert_eq!(points.len(), 2);
            }
            other => panic!("expected match, got {:?}", other),
        }
        assert_eq!(s.actor(0).unwrap().score, MATCH_SCORE);
        assert_eq!(s.actor(0).unwrap().selection, SelectionSlot::Idle);
        assert_eq!(s.status(), SessionStatus::Playing);
    }

    #[test]
    fn test_reject_reselects() {
        let mut s = session(vec![vec![1, 2, 1, 2]], 1);
        let a = id_at(&s, 0, 0);
        let b = id_at(&s, 0, 1);

        s.activate(0, a).unwrap();
        assert_eq!(s.activate(0, b).unwrap(), ActivationOutcome::Reselected);
        assert!(!s.board().tile(a).unwrap().active);
        assert!(s.board().tile(b).unwrap().active);
        assert_eq!(s.actor(0).unwrap().selection, SelectionSlot::Selected(b));
    }

    #[test]
    fn test_players_have_separate_selections() {
        let mut s = session(vec![vec![1, 1, 2, 2]], 2);
        let a = id_at(&s, 0, 0);
        let c = id_at(&s, 0, 2);
        let d = id_at(&s, 0, 3);

        s.activate(0, a).unwrap();
        s.activate(1, c).unwrap();
        assert!(matches!(
            s.activate(1, d).unwrap(),
            ActivationOutcome::Matched { .. }
        ));
        assert_eq!(s.actor(0).unwrap().selection, SelectionSlot::Selected(a));
        assert_eq!(s.actor(1).unwrap().score, MATCH_SCORE);
        assert_eq!(s.actor(0).unwrap().score, 0);
    }

    #[test]
    fn test_reject_keeps_highlight_held_by_other_player() {
        let mut s = session(vec![vec![1, 2, 9, 1]], 2);
        let x = id_at(&s, 0, 0);
        let y = id_at(&s, 0, 1);

        s.activate(0, x).unwrap();
        s.activate(1, x).unwrap();
        assert_eq!(s.activate(1, y).unwrap(), ActivationOutcome::Reselected);

        assert_eq!(s.actor(0).unwrap().selection, SelectionSlot::Selected(x));
        assert_eq!(s.actor(1).unwrap().selection, SelectionSlot::Selected(y));
        assert!(s.board().tile(x).unwrap().active);
        assert!(s.board().tile(y).unwrap().active);

        // Player 1 finishes the pair over the top border.
        let other = id_at(&s, 0, 3);
        assert!(matches!(
            s.activate(0, other).unwrap(),
            ActivationOutcome::Matched { .. }
        ));
        assert_eq!(s.actor(0).unwrap().score, MATCH_SCORE);
    }

    #[test]
    fn test_selection_of_removed_tile_is_dropped() {
        let mut s = session(vec![vec![1, 1, -1, 3, -1, 3]], 2);
        let a = id_at(&s, 0, 0);
        let b = id_at(&s, 0, 1);

        s.activate(0, a).unwrap();
        s.activate(1, b).unwrap();
        s.activate(1, a).unwrap();
        assert_eq!(s.actor(0).unwrap().selection, SelectionSlot::Idle);
    }

    #[test]
    fn test_clearing_the_board() {
        let mut s = session(vec![vec![4, 4]], 1);
        let a = id_at(&s, 0, 0);
        let b = id_at(&s, 0, 1);
        s.activate(0, a).unwrap();
        s.activate(0, b).unwrap();
        assert_eq!(s.status(), SessionStatus::Cleared);
        assert!(s.activate(0, a).is_err());
    }

    #[test]
    fn test_deadlock_detected_after_match() {
        // Removing the 1s leaves the 3 at (2, 2) walled in and every other type unique.
        let mut s = session(
            vec![
                vec![1, 1, 4, 5],
                vec![6, 3, 7, 8],
                vec![10, 11, 3, 12],
                vec![13, 14, 15, 16],
            ],
            1,
        );
        assert_eq!(s.status(), SessionStatus::Playing);
        let a = id_at(&s, 0, 0);
        let b = id_at(&s, 0, 1);
        s.activate(0, a).unwrap();
        s.activate(0, b).unwrap();
        assert_eq!(s.status(), SessionStatus::Deadlocked);
    }

    #[test]
    fn test_status_rechecked_only_when_pairs_can_change() {
        let mut s = session(vec![vec![1, 1, 2, 2]], 1);
        s.board
            .restore_grid(Grid::from_rows(vec![vec![1, 2, 3, 4]]).unwrap());

        let id = s.board.spawn_power_tile(ToolKind::AddTime, 0, 10).unwrap();
        s.activate(0, id).unwrap();
        assert_eq!(s.activate(0, id_at(&s, 0, 0)).unwrap(), ActivationOutcome::Selected);
        assert_eq!(s.status(), SessionStatus::Playing);

        let id = s.board.spawn_power_tile(ToolKind::Shuffle, 0, 10).unwrap();
        s.activate(0, id).unwrap();
        assert_eq!(s.status(), SessionStatus::Deadlocked);
    }

    #[test]
    fn test_countdown_and_pause() {
        let mut s = session(vec![vec![1, 1]], 1);
        s.tick(20);
        assert_eq!(s.remaining_time(), INITIAL_COUNTDOWN_SECS - 20);

        assert!(s.toggle_pause());
        s.tick(50);
        assert_eq!(s.remaining_time(), INITIAL_COUNTDOWN_SECS - 20);
        assert!(s.activate(0, id_at(&s, 0, 0)).is_err());
        assert!(!s.toggle_pause());

        assert_eq!(s.tick(1000), SessionStatus::TimeUp);
        assert_eq!(s.remaining_time(), 0);
    }

    #[test]
    fn test_power_tiles_spawn_and_expire_with_clock() {
        let board = BoardManager::from_grid_seeded(Grid::from_rows(vec![vec![1, 1]]).unwrap(), 2);
        let mut s = Session::with_board(board, SessionConfig::default())
            .unwrap()
            .with_seed(9);

        s.tick(POWER_TILE_SPAWN_INTERVAL_SECS - 1);
        assert_eq!(s.board().power_tiles().count(), 0);
        s.tick(1);
        assert_eq!(s.board().power_tiles().count(), 1);
        s.tick(POWER_TILE_LIFETIME_SECS);
        assert_eq!(s.board().power_tiles().count(), 0);
    }

    #[test]
    fn test_add_time_tool() {
        let mut s = session(vec![vec![1, 1]], 1);
        let id = s.board.spawn_power_tile(ToolKind::AddTime, 0, 10).unwrap();
        assert_eq!(
            s.activate(0, id).unwrap(),
            ActivationOutcome::ToolUsed(ToolKind::AddTime)
        );
        assert_eq!(
            s.remaining_time(),
            INITIAL_COUNTDOWN_SECS + ADD_TIME_BONUS_SECS
        );
        assert!(s.board().tile(id).is_none());
    }

    #[test]
    fn test_hint_tool_marks_pair_until_expiry() {
        let mut s = session(vec![vec![1, 1, 2]], 1);
        let id = s.board.spawn_power_tile(ToolKind::Hint, 0, 10).unwrap();
        s.activate(0, id).unwrap();

        let (a, b) = s.hint().unwrap();
        assert!(s.board().tile(a).unwrap().hinted);
        assert!(s.board().tile(b).unwrap().hinted);

        s.tick(HINT_DURATION_SECS);
        assert!(s.hint().is_none());
        assert!(!s.board().tile(a).unwrap().hinted);
    }

    #[test]
    fn test_shuffle_tool_resets_selection() {
        let mut s = session(vec![vec![1, 2, 1, 2], vec![-1, -1, -1, -1]], 1);
        let a = id_at(&s, 0, 0);
        s.activate(0, a).unwrap();
        let id = s.board.spawn_power_tile(ToolKind::Shuffle, 0, 10).unwrap();
        s.activate(0, id).unwrap();
        assert_eq!(s.actor(0).unwrap().selection, SelectionSlot::Idle);
        assert_eq!(s.board().tile_count(), 4);
    }

    #[test]
    fn test_snapshot_and_restore() {
        let mut s = session(vec![vec![1, 1, 2, 2]], 2);
        s.set_actor_position(1, (10.0, 20.0)).unwrap();
        s.activate(0, id_at(&s, 0, 0)).unwrap();
        s.activate(0, id_at(&s, 0, 1)).unwrap();
        s.tick(7);
        let saved = s.snapshot();
        assert_eq!(saved.scores, vec![MATCH_SCORE, 0]);
        assert_eq!(saved.remaining_time, INITIAL_COUNTDOWN_SECS - 7);

        let mut fresh = session(vec![vec![5, 5, 5, 5]], 2);
        fresh.restore(saved.clone()).unwrap();
        assert_eq!(fresh.snapshot(), saved);
        assert_eq!(fresh.board().tile_count(), 2);
    }

    #[test]
    fn test_restore_rejects_actor_mismatch() {
        let two = session(vec![vec![1, 1]], 2);
        let mut one = session(vec![vec![3, 3, 3, 3]], 1);
        let before = one.snapshot();

        let err = one.restore(two.snapshot()).unwrap_err();
        assert!(matches!(
            err,
            PairlinkError::ActorCountMismatch { saved: 2, active: 1 }
        ));
        assert_eq!(one.snapshot(), before);
    }

    #[test]
    fn test_config_validation() {
        assert!(SessionConfig::new(0).validate().is_err());
        assert!(SessionConfig::new(3).validate().is_err());
        assert!(SessionConfig::new(2).validate().is_ok());
        let config: GameConfig =
            serde_json::from_str(r#"{ "session": { "players": 2 } }"#).unwrap();
        assert_eq!(config.session.players, 2);
        assert_eq!(config.generation, GenerationConfig::default());
    }

    #[test]
    fn test_unknown_player() {
        let mut s = session(vec![vec![1, 1]], 1);
        let a = id_at(&s, 0, 0);
        assert!(s.activate(1, a).is_err());
    }
}
