//! # Pairlink
//!
//! A tile-matching ("match-pair") puzzle engine. Two tiles of the same type can be removed
//! when they are connected by an orthogonal path with at most two turns that only crosses
//! empty cells.
//!
//! ## Architecture Overview
//!
//! - **Grid**: the `rows × cols` matrix of tile types, with a padded view that adds an
//!   always-empty border so paths may route around the board edge
//! - **Path Finder**: straight, one-turn and two-turn connectivity search, in that order
//! - **Board Manager**: owns tile entities, generation, matching, shuffling and deadlock
//!   detection
//! - **Session**: per-player selection slots, scores, countdown and power tiles layered on
//!   top of the board
//! - **Persistence**: versioned big-endian save format
//!
//! All operations are synchronous and CPU-bound. A [`BoardManager`] is owned by a single
//! controller; callers serialize access themselves.

pub mod game;
pub mod generation;
pub mod input;
pub mod pathfinding;
pub mod persistence;
pub mod rendering;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use pathfinding::*;
pub use persistence::*;
pub use rendering::*;

/// Core error type for the Pairlink engine.
#[derive(thiserror::Error, Debug)]
pub enum PairlinkError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Grid access outside `[0, rows) × [0, cols)`
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        rows: usize,
        cols: usize,
    },

    /// Board state is invalid
    #[error("Invalid board state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Save data could not be decoded
    #[error(transparent)]
    Decode(#[from] persistence::DecodeError),

    /// Save file was written for a different number of players
    #[error("Save file holds {saved} player(s) but the current game has {active}")]
    ActorCountMismatch { saved: usize, active: usize },
}

/// Result type used throughout the Pairlink codebase.
pub type PairlinkResult<T> = Result<T, PairlinkError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default board height in cells
    pub const DEFAULT_ROWS: usize = 4;

    /// Default board width in cells
    pub const DEFAULT_COLS: usize = 6;

    /// Default number of distinct tile types on a board
    pub const DEFAULT_TYPE_COUNT: usize = 4;

    /// Number of sprites in the tile catalog; type ids are drawn from `0..SPRITE_CATALOG_SIZE`
    pub const SPRITE_CATALOG_SIZE: usize = 164;

    /// Most players that can share one board
    pub const MAX_PLAYERS: usize = 2;

    /// Countdown at the start of a session
    pub const INITIAL_COUNTDOWN_SECS: i32 = 120;

    /// Points awarded to a player for each matched pair
    pub const MATCH_SCORE: i32 = 10;

    /// Seconds added by the add-time power tile
    pub const ADD_TIME_BONUS_SECS: i32 = 30;

    /// Seconds a power tile stays on the board before it expires
    pub const POWER_TILE_LIFETIME_SECS: u64 = 10;

    /// Seconds between power tile spawns
    pub const POWER_TILE_SPAWN_INTERVAL_SECS: u64 = 15;

    /// Seconds a hinted pair stays highlighted
    pub const HINT_DURATION_SECS: u64 = 5;

    /// Sprite frame size in pixels
    pub const FRAME_SIZE: u32 = 26;

    /// Gap between neighbouring sprites in pixels
    pub const CELL_GAP: u32 = 15;

    /// Default viewport width in pixels
    pub const VIEWPORT_WIDTH: f64 = 800.0;

    /// Default viewport height in pixels
    pub const VIEWPORT_HEIGHT: f64 = 600.0;

    /// Boards generated before giving up on a solvable layout
    pub const MAX_GENERATION_ATTEMPTS: u32 = 64;

    /// Permutations tried by a shuffle before accepting a deadlocked board
    pub const MAX_SHUFFLE_ATTEMPTS: u32 = 16;

    /// File extension for save files
    pub const SAVE_FILE_EXTENSION: &str = "lksav";
}
