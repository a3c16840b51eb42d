//! Game settings and preferences
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_AUTO_PLAY_DELAY_MS, DEFAULT_MAX_AUTO_MOVES, MIN_GRID_SIZE};
use crate::error::EngineError;
use crate::sim::MergePolicy;

/// Board size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Side length of the board for this preset
    pub fn grid_size(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 5,
            Difficulty::Hard => 6,
        }
    }
}

/// Failure to load or validate settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] EngineError),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Overrides the difficulty preset when set
    pub grid_size: Option<usize>,
    pub merge_policy: MergePolicy,
    /// Pause between auto-play moves (presentation only)
    pub auto_play_delay_ms: u64,
    /// Fixed RNG seed; a random one is drawn when absent
    pub seed: Option<u64>,
    /// Safety cap on moves per auto-played run
    pub max_auto_moves: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            grid_size: None,
            merge_policy: MergePolicy::PerTile,
            auto_play_delay_ms: DEFAULT_AUTO_PLAY_DELAY_MS,
            seed: None,
            max_auto_moves: DEFAULT_MAX_AUTO_MOVES,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Effective board size
    pub fn grid_size(&self) -> usize {
        self.grid_size.unwrap_or_else(|| self.difficulty.grid_size())
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let size = self.grid_size();
        if size < MIN_GRID_SIZE {
            return Err(EngineError::InvalidGridSize(size));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
