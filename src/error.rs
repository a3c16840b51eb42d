//! Engine error types

use thiserror::Error;

use crate::consts::{MAX_TILE, MIN_GRID_SIZE};

/// Contract violations reported by the grid engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Direction text that does not name one of the four moves
    #[error("invalid direction `{0}` (expected Up, Down, Left or Right)")]
    InvalidDirection(String),
    /// Grid too small for merging and terminal detection to mean anything
    #[error("invalid grid size {0} (minimum is {min})", min = MIN_GRID_SIZE)]
    InvalidGridSize(usize),
    #[error("grid is not square: row {row} has {len} cells, expected {expected}")]
    NonSquareGrid {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error(
        "cell ({row}, {col}) holds {value}, which is neither empty nor a power of two up to {max}",
        max = MAX_TILE
    )]
    InvalidTile { row: usize, col: usize, value: u64 },
    #[error("invalid merge policy `{0}` (expected per-tile or per-row)")]
    InvalidMergePolicy(String),
}
