//! Application configuration, loadable from TOML.
//!
//! ```toml
//! board_size = 8
//! seed = 7
//!
//! [black]
//! kind = "human"
//!
//! [white]
//! kind = "computer"
//! difficulty = "hard"
//!
//! [search]
//! depth = 4
//! pruning = true
//! ```

use crate::evaluation::{Heuristic, Weights};
use crate::search::SearchOptions;
use crate::session::{Controller, Session};
use crate::strategy::{Difficulty, MoveSelector};
use derive_more::{Display, Error};
use flanker_othello::{Board, BoardError, GameState, Player, EDGE_LENGTH};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Deepest search accepted from configuration.
pub const MAX_SEARCH_DEPTH: u32 = 8;

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display(fmt = "failed to read {}: {}", "path.display()", source)]
    FileRead { path: PathBuf, source: std::io::Error },
    #[display(fmt = "invalid config: {}", _0)]
    Parse(toml::de::Error),
    #[display(fmt = "invalid config: {}", _0)]
    Validation(#[error(not(source))] String),
    #[display(fmt = "invalid config: {}", _0)]
    Board(BoardError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<BoardError> for ConfigError {
    fn from(err: BoardError) -> Self {
        ConfigError::Board(err)
    }
}

/// Who sits at one color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeatConfig {
    Human,
    Computer {
        #[serde(default)]
        difficulty: Difficulty,
    },
}

impl SeatConfig {
    pub fn computer(difficulty: Difficulty) -> Self {
        SeatConfig::Computer { difficulty }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board_size: usize,
    pub black: SeatConfig,
    pub white: SeatConfig,
    pub search: SearchOptions,
    pub weights: Weights,
    /// Seed for the random strategies. Fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            board_size: EDGE_LENGTH,
            black: SeatConfig::Human,
            white: SeatConfig::computer(Difficulty::Medium),
            search: SearchOptions::default(),
            weights: Weights::default(),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Board::check_size(self.board_size)?;

        if self.search.depth == 0 {
            return Err(ConfigError::Validation("search.depth must be > 0".into()));
        }
        if self.search.depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.depth must be <= {}",
                MAX_SEARCH_DEPTH
            )));
        }

        Ok(())
    }

    pub fn seat(&self, player: Player) -> SeatConfig {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub fn heuristic(&self) -> Heuristic {
        Heuristic::new(self.weights)
    }

    /// The built-in strategy for `difficulty` with this configuration's search settings.
    ///
    /// With a seed, `stream` selects an independent reproducible random sequence,
    /// so two computers in one game do not mirror each other.
    pub fn selector(&self, difficulty: Difficulty, stream: u64) -> MoveSelector {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        };
        MoveSelector::with_options(difficulty, self.search, self.heuristic(), rng)
    }

    pub fn controller(&self, player: Player) -> Controller {
        match self.seat(player) {
            SeatConfig::Human => Controller::Human,
            SeatConfig::Computer { difficulty } => {
                Controller::computer(self.selector(difficulty, player as u64))
            }
        }
    }

    /// A fresh game at the opening position with the configured seats.
    pub fn new_session(&self) -> Result<Session, ConfigError> {
        let board = Board::with_size(self.board_size)?;
        Ok(Session::new(
            GameState::new(board),
            self.controller(Player::Black),
            self.controller(Player::White),
        ))
    }
}
