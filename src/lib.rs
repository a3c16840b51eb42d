//! Tile Merge - a sliding-tile puzzle on an N×N grid
//!
//! Core modules:
//! - `sim`: Deterministic grid engine (slides, merges, spawns, game over)
//! - `session`: Seeded driver for a presentation layer, including auto-play
//! - `settings`: Difficulty presets and JSON configuration
//! - `highscores`: In-memory leaderboard of finished runs

pub mod error;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::EngineError;
pub use highscores::HighScores;
pub use session::{AutoPlaySummary, Session};
pub use settings::{Difficulty, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Smallest board on which merging and game over are meaningful
    pub const MIN_GRID_SIZE: usize = 2;
    /// Largest tile value a grid may hold. Tiles at this value no longer merge,
    /// so doubling can never overflow a `u64`.
    pub const MAX_TILE: u64 = 1 << 62;
    /// Tiles placed on a fresh board
    pub const INITIAL_TILES: usize = 2;
    /// Chance that a spawned tile is a 2 (otherwise 4)
    pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

    /// Auto-play pacing between moves
    pub const DEFAULT_AUTO_PLAY_DELAY_MS: u64 = 200;
    /// Upper bound on moves in one auto-played run
    pub const DEFAULT_MAX_AUTO_MOVES: u32 = 10_000;
}
