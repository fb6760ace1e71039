//! Computer-vs-computer matches, played in parallel.

use crate::config::{AppConfig, ConfigError};
use crate::session::{Controller, GameRecord, GameResult, Session};
use crate::strategy::Difficulty;
use flanker_othello::{Board, GameState, Player};
use rayon::prelude::*;
use std::ops::Add;
use tracing::{debug, warn};

/// One finished arena game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaGame {
    /// The color the first difficulty played.
    pub first_color: Player,
    pub record: GameRecord,
}

impl ArenaGame {
    pub fn first_result(&self) -> GameResult {
        self.record.result_for(self.first_color)
    }

    pub fn first_margin(&self) -> isize {
        self.record.score.difference(self.first_color)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArenaSummary {
    pub games: u32,
    pub wins_first: u32,
    pub wins_second: u32,
    pub draws: u32,
    /// Average final disc difference, from the first difficulty's point of view.
    pub average_margin: f64,
}

impl ArenaSummary {
    pub fn summarize(games: &[ArenaGame]) -> Self {
        let tally = games.iter().map(Tally::of).fold(Tally::default(), Tally::add);
        let count = games.len() as u32;
        Self {
            games: count,
            wins_first: tally.wins_first,
            wins_second: tally.wins_second,
            draws: count - tally.wins_first - tally.wins_second,
            average_margin: if count == 0 {
                0.0
            } else {
                tally.margin as f64 / count as f64
            },
        }
    }

    pub fn win_rate_first(&self) -> f64 {
        self.rate(self.wins_first)
    }

    pub fn win_rate_second(&self) -> f64 {
        self.rate(self.wins_second)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    fn rate(&self, count: u32) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    wins_first: u32,
    wins_second: u32,
    margin: i64,
}

impl Tally {
    fn of(game: &ArenaGame) -> Self {
        let result = game.first_result();
        Tally {
            wins_first: (result == GameResult::Win) as u32,
            wins_second: (result == GameResult::Loss) as u32,
            margin: game.first_margin() as i64,
        }
    }
}

impl Add for Tally {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Tally {
            wins_first: self.wins_first + rhs.wins_first,
            wins_second: self.wins_second + rhs.wins_second,
            margin: self.margin + rhs.margin,
        }
    }
}

/// Play `games` games between `first` and `second`, alternating colors: the first difficulty
/// plays Black in even-numbered games. `on_finish` is called from worker threads as games end.
///
/// Seats, board size, search settings and seed come from `config`. Games are returned in order.
pub fn run(
    config: &AppConfig,
    first: Difficulty,
    second: Difficulty,
    games: u32,
    on_finish: impl Fn(&ArenaGame) + Sync,
) -> Result<Vec<ArenaGame>, ConfigError> {
    let board = Board::with_size(config.board_size)?;

    let played = (0..games)
        .into_par_iter()
        .filter_map(|i| {
            let first_color = if i % 2 == 0 { Player::Black } else { Player::White };
            let (black, white) = match first_color {
                Player::Black => (first, second),
                Player::White => (second, first),
            };

            let stream = 2 * u64::from(i);
            let mut session = Session::new(
                GameState::new(board.clone()),
                Controller::computer(config.selector(black, stream)),
                Controller::computer(config.selector(white, stream + 1)),
            );
            session.advance();

            let game = match session.record() {
                Some(record) => ArenaGame {
                    first_color,
                    record,
                },
                None => {
                    warn!(game = i, "arena game stalled before the end");
                    return None;
                }
            };
            debug!(game = i, score = %game.record.score, "arena game finished");
            on_finish(&game);
            Some(game)
        })
        .collect();

    Ok(played)
}
