//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use quantum_tictactoe::{DEFAULT_COLLAPSE_CHANCE, Difficulty, MIN_BOARD_SIZE};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings shared by `play` and `simulate`.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board dimension.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// AI difficulty.
    #[serde(default)]
    difficulty: Difficulty,

    /// Probability that the AI collapses a move instead of placing one.
    #[serde(default = "default_collapse_chance")]
    collapse_chance: f64,

    /// Fixed seed for reproducible games.
    #[serde(default)]
    seed: Option<u64>,
}

fn default_board_size() -> usize {
    3
}

fn default_collapse_chance() -> f64 {
    DEFAULT_COLLAPSE_CHANCE
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            difficulty: Difficulty::default(),
            collapse_chance: default_collapse_chance(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(
            board_size = config.board_size,
            difficulty = %config.difficulty,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::new(format!(
                "board_size must be at least {}, got {}",
                MIN_BOARD_SIZE, self.board_size
            )));
        }
        if !(0.0..=1.0).contains(&self.collapse_chance) {
            return Err(ConfigError::new(format!(
                "collapse_chance must be within 0..=1, got {}",
                self.collapse_chance
            )));
        }
        Ok(())
    }

    /// Applies command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        board_size: Option<usize>,
        difficulty: Option<Difficulty>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(size) = board_size {
            self.board_size = size;
        }
        if let Some(difficulty) = difficulty {
            self.difficulty = difficulty;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self.validate()?;
        Ok(self)
    }

    /// Random source for a session: seeded when configured.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
