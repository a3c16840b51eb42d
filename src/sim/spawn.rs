//! Random tile spawning

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid, Tile};
use crate::consts::SPAWN_TWO_PROBABILITY;

/// A tile placed by [`spawn_tile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    pub cell: Cell,
    pub value: Tile,
}

/// Draw a spawn value: 2 with probability 0.9, otherwise 4
pub fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.random::<f64>() < SPAWN_TWO_PROBABILITY { 2 } else { 4 }
}

/// Place a 2 or 4 into a uniformly chosen empty cell.
///
/// Returns `None` and leaves the grid untouched when it is full.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<SpawnedTile> {
    let empties = grid.empty_cells();
    if empties.is_empty() {
        return None;
    }
    let cell = empties[rng.random_range(0..empties.len())];
    let value = random_tile_value(rng);
    grid.set(cell.0, cell.1, value);
    Some(SpawnedTile { cell, value })
}
