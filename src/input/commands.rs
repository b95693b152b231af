//! # Command Definitions
//!
//! Commands accepted by the terminal front end.

use std::path::PathBuf;

/// A parsed player command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Activate the tile at a padded grid cell
    Pick { player: usize, row: i32, col: i32 },
    /// Activate the tile under a pixel position
    Click { player: usize, x: f64, y: f64 },
    /// Advance the clock
    Tick(u64),
    /// Show a connectable pair without using a hint tile
    Hint,
    /// Toggle the pause state
    Pause,
    /// Redraw the board
    Show,
    /// Write a save file
    Save(PathBuf),
    /// Load a save file into the current game
    Load(PathBuf),
    /// Start over on a fresh board
    NewGame,
    Help,
    Quit,
}

impl Command {
    /// Whether the command changes game state.
    pub fn is_game_action(&self) -> bool {
        matches!(
            self,
            Command::Pick { .. } | Command::Click { .. } | Command::Tick(_) | Command::Load(_)
        )
    }
}

/// Help text listing every command.
pub const HELP_TEXT: &str = "\
Commands:
  pick <row> <col> [player]   activate the tile at a cell (border cells are -1 and rows/cols)
  click <x> <y> [player]      activate the tile under a pixel position
  tick [seconds]              advance the clock (default 1)
  hint                        show a connectable pair
  pause                       pause or resume
  show                        redraw the board
  save <file>                 save the game (.lksav is appended)
  load <file>                 load a saved game
  new                         start a new board
  help                        show this text
  quit                        leave the game";
