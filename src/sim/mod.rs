//! Deterministic grid engine
//!
//! All game rules live here. This module must stay pure and deterministic:
//! - Randomness only through a caller-supplied `Rng`
//! - No rendering, platform or logging dependencies
//! - No references retained between calls

pub mod grid;
pub mod slide;
pub mod spawn;
pub mod state;
pub mod tick;

pub use grid::{Cell, Grid, Tile, is_terminal};
pub use slide::{Direction, MergePolicy, MoveResult, apply_move, apply_move_with, slide_row_left};
pub use spawn::{SpawnedTile, random_tile_value, spawn_tile};
pub use state::{GamePhase, GameState};
pub use tick::{MoveReport, TickInput, TickOutcome, tick};
