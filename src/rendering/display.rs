//! # Text Display
//!
//! Plain-text rendering of the board and session for the terminal binary.

use crate::{BoardManager, Position, Session, SessionStatus, Tile, ToolKind};
use std::fmt::Write;

const CELL_WIDTH: usize = 6;

/// Renders the padded board as a text grid with row and column labels.
///
/// Regular tiles show their type, `[n]` when selected and `<n>` when hinted. Power tiles
/// show `+T`, `~S` and `?H` for add-time, shuffle and hint. Empty cells are `.`.
///
/// # Examples
///
/// ```
/// use pairlink::{render_board, BoardManager, Grid};
///
/// let board = BoardManager::from_grid(Grid::from_rows(vec![vec![3, -1]]).unwrap());
/// let text = render_board(&board);
/// assert!(text.contains(" 3 "));
/// assert_eq!(text.lines().count(), 4);
/// ```
pub fn render_board(board: &BoardManager) -> String {
    let rows = board.grid().rows() as i32;
    let cols = board.grid().cols() as i32;
    let mut out = String::new();

    out.push_str(&" ".repeat(4));
    for col in -1..=cols {
        let _ = write!(out, "{:^width$}", col, width = CELL_WIDTH);
    }
    out.push('\n');

    for row in -1..=rows {
        let _ = write!(out, "{:>3} ", row);
        for col in -1..=cols {
            let label = cell_label(board.tile_at(Position::new(row, col)));
            let _ = write!(out, "{:^width$}", label, width = CELL_WIDTH);
        }
        out.push('\n');
    }
    out
}

fn cell_label(tile: Option<&Tile>) -> String {
    let tile = match tile {
        Some(tile) => tile,
        None => return ".".to_string(),
    };
    match tile.tool {
        ToolKind::AddTime => "+T".to_string(),
        ToolKind::Shuffle => "~S".to_string(),
        ToolKind::Hint => "?H".to_string(),
        ToolKind::None if tile.active => format!("[{}]", tile.tile_type),
        ToolKind::None if tile.hinted => format!("<{}>", tile.tile_type),
        ToolKind::None => tile.tile_type.to_string(),
    }
}

/// One-line summary of the clock, scores and game state.
pub fn render_status(session: &Session) -> String {
    let mut out = format!("Time {:>3}s", session.remaining_time());
    for actor in session.actors() {
        let _ = write!(out, " | {}: {}", actor.name, actor.score);
    }
    let _ = write!(out, " | {} tiles", session.board().tile_count());
    let state = match session.status() {
        SessionStatus::Playing if session.is_paused() => "paused",
        SessionStatus::Playing => "playing",
        SessionStatus::TimeUp => "time up",
        SessionStatus::Deadlocked => "no moves left",
        SessionStatus::Cleared => "cleared",
    };
    let _ = write!(out, " | {}", state);
    out
}

/// Rolling message log shown under the board.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Vec<String>,
    max_messages: usize,
}

impl MessageLog {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    /// Adds a message, dropping the oldest beyond the limit.
    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// The most recent `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> &[String] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(100)
    }
}
