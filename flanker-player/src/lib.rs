//! Computer opponents for `flanker-othello`, and the session that runs a game against them.
//!
//!  - [`evaluation`]: static scoring of positions.
//!  - [`search`]: fixed-depth minimax over those scores.
//!  - [`strategy`]: the easy, medium and hard opponents behind the [`MoveSource`] interface.
//!  - [`session`]: one game in progress, with human and computer seats.
//!  - [`arena`]: computer-vs-computer matches.
//!  - [`config`]: TOML configuration tying the above together.

pub mod arena;
pub mod config;
pub mod evaluation;
pub mod search;
pub mod session;
pub mod strategy;

pub use config::{AppConfig, ConfigError};
pub use evaluation::{Evaluator, Heuristic, Weights};
pub use search::{SearchOptions, SearchResult};
pub use session::{Controller, GameRecord, GameResult, Session, SessionError, Turn};
pub use strategy::{choose_move, Difficulty, MoveSelector, MoveSource};
