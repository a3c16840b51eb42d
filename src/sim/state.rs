//! Game state and lifecycle
//!
//! The caller owns the state; engine functions borrow it for the duration of
//! a single call.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Tile};
use super::spawn::spawn_tile;
use crate::consts::INITIAL_TILES;
use crate::error::EngineError;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Moves are accepted
    Playing,
    /// No move can change the board; only a replay leaves this phase
    GameOver,
}

/// Complete game state (serializable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    /// Score of the current run
    pub score: u64,
    /// Best score seen since this state was created; survives replays
    pub highest_score: u64,
    pub phase: GamePhase,
    /// Moves that changed the board in the current run
    pub moves: u32,
}

impl GameState {
    /// Fresh game: empty grid with two spawned tiles
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, EngineError> {
        let mut state = Self::from_grid(Grid::new(size)?);
        state.spawn_initial_tiles(rng);
        Ok(state)
    }

    /// Wrap an existing grid, e.g. a scripted position
    pub fn from_grid(grid: Grid) -> Self {
        let phase = if grid.is_terminal() {
            GamePhase::GameOver
        } else {
            GamePhase::Playing
        };
        Self {
            grid,
            score: 0,
            highest_score: 0,
            phase,
            moves: 0,
        }
    }

    /// Start over on a clean grid of the same size, keeping the highest score
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.grid = self.cleared_grid();
        self.score = 0;
        self.moves = 0;
        self.phase = GamePhase::Playing;
        self.spawn_initial_tiles(rng);
    }

    fn cleared_grid(&self) -> Grid {
        let mut grid = self.grid.clone();
        for row in 0..grid.size() {
            grid.row_mut(row).fill(0);
        }
        grid
    }

    fn spawn_initial_tiles<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..INITIAL_TILES {
            spawn_tile(&mut self.grid, rng);
        }
    }

    /// Add merged value to the score and track the best; saturates at `u64::MAX`
    pub fn add_score(&mut self, delta: u64) {
        self.score = self.score.saturating_add(delta);
        self.highest_score = self.highest_score.max(self.score);
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn max_tile(&self) -> Tile {
        self.grid.max_tile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_game_has_two_tiles() {
        let mut rng = Pcg32::seed_from_u64(12345);
        for size in [4, 5, 6] {
            let state = GameState::new(size, &mut rng).unwrap();
            assert_eq!(state.size(), size);
            assert_eq!(state.grid.count_empty(), size * size - 2);
            assert_eq!(state.score, 0);
            assert_eq!(state.phase, GamePhase::Playing);
        }
    }

    #[test]
    fn test_degenerate_size_rejected() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(
            GameState::new(1, &mut rng).unwrap_err(),
            EngineError::InvalidGridSize(1)
        );
    }

    #[test]
    fn test_reset_keeps_highest_score() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = GameState::new(4, &mut rng).unwrap();
        state.add_score(64);
        state.moves = 12;
        state.phase = GamePhase::GameOver;

        state.reset(&mut rng);
        assert_eq!(state.score, 0);
        assert_eq!(state.moves, 0);
        assert_eq!(state.highest_score, 64);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.grid.count_empty(), 14);
    }

    #[test]
    fn test_highest_score_tracks_max() {
        let mut state = GameState::from_grid(Grid::new(4).unwrap());
        state.add_score(8);
        state.add_score(4);
        assert_eq!(state.highest_score, 12);
        state.score = 0;
        state.add_score(4);
        assert_eq!(state.highest_score, 12);
    }

    #[test]
    fn test_score_saturates() {
        let mut state = GameState::from_grid(Grid::new(2).unwrap());
        state.add_score(u64::MAX - 4);
        state.add_score(8);
        assert_eq!(state.score, u64::MAX);
        assert_eq!(state.highest_score, u64::MAX);
    }

    #[test]
    fn test_determinism() {
        let a = GameState::new(5, &mut Pcg32::seed_from_u64(99999)).unwrap();
        let b = GameState::new(5, &mut Pcg32::seed_from_u64(99999)).unwrap();
        assert_eq!(a, b);
    }
}
