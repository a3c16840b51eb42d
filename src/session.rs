//! Play session
//!
//! Drives one [`GameState`] with a seeded RNG on behalf of a presentation
//! layer, and records finished runs on the leaderboard.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::EngineError;
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{Direction, GameState, MoveReport, TickInput, TickOutcome, tick};

/// Totals for one auto-played run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlaySummary {
    pub moves: u32,
    pub score: u64,
    pub game_over: bool,
}

pub struct Session {
    state: GameState,
    rng: Pcg32,
    seed: u64,
    settings: Settings,
    high_scores: HighScores,
    /// Current run has already been put on the leaderboard
    run_recorded: bool,
}

impl Session {
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(settings.grid_size(), &mut rng)?;
        log::info!(
            "New {}x{} game ({} merges) with seed {}",
            state.size(),
            state.size(),
            settings.merge_policy.as_str(),
            seed
        );
        Ok(Self {
            state,
            rng,
            seed,
            settings,
            high_scores: HighScores::new(),
            run_recorded: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Apply one request to the game
    pub fn tick(&mut self, input: TickInput) -> TickOutcome {
        if input == TickInput::Replay {
            self.finish_run();
        }
        let outcome = tick(
            &mut self.state,
            input,
            self.settings.merge_policy,
            &mut self.rng,
        );
        match &outcome {
            TickOutcome::Moved(report) => {
                log::debug!(
                    "{} -> +{} (changed: {}, spawned: {:?})",
                    report.direction,
                    report.score_delta,
                    report.changed,
                    report.spawned
                );
                if report.game_over {
                    log::info!(
                        "Game over: score {}, max tile {}, {} moves",
                        self.state.score,
                        self.state.max_tile(),
                        self.state.moves
                    );
                    self.finish_run();
                }
            }
            TickOutcome::Frozen => log::warn!("Move ignored: game is over"),
            TickOutcome::Replayed => {
                self.run_recorded = false;
                log::info!("Replay (highest score {})", self.state.highest_score);
            }
        }
        outcome
    }

    /// Play a move in the given direction
    pub fn play(&mut self, direction: Direction) -> TickOutcome {
        self.tick(TickInput::Move(direction))
    }

    /// Start a new run, keeping the highest score and leaderboard
    pub fn replay(&mut self) {
        self.tick(TickInput::Replay);
    }

    /// Play random moves until the run ends or the move cap is hit.
    ///
    /// `on_move` runs after every move so the caller can render or pace the
    /// loop; the session itself never waits.
    pub fn auto_play<F>(&mut self, mut on_move: F) -> AutoPlaySummary
    where
        F: FnMut(&GameState, &MoveReport),
    {
        let mut attempts = 0;
        while !self.state.is_game_over() && attempts < self.settings.max_auto_moves {
            attempts += 1;
            if let TickOutcome::Moved(report) = self.tick(TickInput::Random) {
                on_move(&self.state, &report);
            }
        }
        if !self.state.is_game_over() {
            log::warn!("Auto-play stopped after {attempts} moves without reaching game over");
        }
        AutoPlaySummary {
            moves: self.state.moves,
            score: self.state.score,
            game_over: self.state.is_game_over(),
        }
    }

    fn finish_run(&mut self) {
        if self.run_recorded {
            return;
        }
        self.run_recorded = true;
        let state = &self.state;
        if let Some(rank) = self
            .high_scores
            .add_score(state.score, state.max_tile(), state.moves)
        {
            log::info!("Run ranked #{rank} with score {}", state.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    fn seeded(difficulty: Difficulty, seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Settings::from_difficulty(difficulty)
        }
    }

    #[test]
    fn test_session_uses_difficulty_size() {
        let session = Session::new(seeded(Difficulty::Hard, 1)).unwrap();
        assert_eq!(session.state().size(), 6);
        assert_eq!(session.seed(), 1);
        assert_eq!(session.state().grid.count_empty(), 34);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let settings = Settings {
            grid_size: Some(1),
            ..Settings::default()
        };
        assert_eq!(
            Session::new(settings).err(),
            Some(EngineError::InvalidGridSize(1))
        );
    }

    #[test]
    fn test_auto_play_reaches_game_over() {
        let mut session = Session::new(seeded(Difficulty::Easy, 2048)).unwrap();
        let mut seen = 0u32;
        let summary = session.auto_play(|_, _| seen += 1);

        assert!(summary.game_over);
        assert!(session.state().is_game_over());
        assert!(seen >= summary.moves);
        assert_eq!(summary.score, session.state().score);
        assert_eq!(session.high_scores().len(), 1);
        assert_eq!(session.high_scores().top_score(), Some(summary.score));
    }

    #[test]
    fn test_replay_records_run_once() {
        let mut session = Session::new(seeded(Difficulty::Easy, 7)).unwrap();
        let first = session.auto_play(|_, _| {});
        session.replay();

        assert_eq!(session.high_scores().len(), 1);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().highest_score, first.score);
        assert!(!session.state().is_game_over());

        session.auto_play(|_, _| {});
        session.replay();
        assert_eq!(session.high_scores().len(), 2);
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut session = Session::new(seeded(Difficulty::Easy, 3)).unwrap();
        session.auto_play(|_, _| {});
        let before = session.state().clone();
        assert_eq!(session.play(Direction::Left), TickOutcome::Frozen);
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Session::new(seeded(Difficulty::Medium, 555)).unwrap();
        let mut b = Session::new(seeded(Difficulty::Medium, 555)).unwrap();
        let sa = a.auto_play(|_, _| {});
        let sb = b.auto_play(|_, _| {});
        assert_eq!(sa, sb);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_move_cap_stops_auto_play() {
        let settings = Settings {
            max_auto_moves: 3,
            ..seeded(Difficulty::Hard, 10)
        };
        let mut session = Session::new(settings).unwrap();
        let summary = session.auto_play(|_, _| {});
        assert!(!summary.game_over);
        assert!(summary.moves <= 3);
    }
}
