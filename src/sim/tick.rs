//! Move transition
//!
//! One call advances the game by a single player request: slide, spawn if the
//! board changed, then check for game over.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::slide::{Direction, MergePolicy, apply_move_with};
use super::spawn::{SpawnedTile, spawn_tile};
use super::state::{GamePhase, GameState};

/// A single request from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickInput {
    /// Slide in the given direction
    Move(Direction),
    /// Slide in a uniformly random direction
    Random,
    /// Start a new run on a fresh grid
    Replay,
}

/// What a move did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Direction actually played (resolved for random requests)
    pub direction: Direction,
    pub score_delta: u64,
    pub changed: bool,
    pub spawned: Option<SpawnedTile>,
    /// The move left the board terminal
    pub game_over: bool,
}

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Moved(MoveReport),
    /// The game is over; moves are ignored until a replay
    Frozen,
    Replayed,
}

/// Advance the game state by one request
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    input: TickInput,
    policy: MergePolicy,
    rng: &mut R,
) -> TickOutcome {
    let direction = match input {
        TickInput::Replay => {
            state.reset(rng);
            return TickOutcome::Replayed;
        }
        _ if state.phase == GamePhase::GameOver => return TickOutcome::Frozen,
        TickInput::Move(direction) => direction,
        TickInput::Random => Direction::random(rng),
    };

    let result = apply_move_with(&state.grid, direction, policy);
    let mut spawned = None;
    if result.changed {
        state.grid = result.grid;
        state.moves += 1;
        spawned = spawn_tile(&mut state.grid, rng);
    }
    state.add_score(result.score_delta);

    if state.grid.is_terminal() {
        state.phase = GamePhase::GameOver;
    }

    TickOutcome::Moved(MoveReport {
        direction,
        score_delta: result.score_delta,
        changed: result.changed,
        spawned,
        game_over: state.is_game_over(),
    })
}
