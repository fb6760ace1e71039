//! Computer opponents: the [`MoveSource`] interface and the three built-in strategies.

use crate::evaluation::{Evaluator, Heuristic};
use crate::search::{self, SearchOptions};
use flanker_othello::{Board, Location, Player};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;

/// Anything that can pick a move for a player: a built-in strategy, a learned policy, a remote peer.
///
/// `legal` must be `board.valid_moves(player)`. Implementations return one of its elements,
/// or None exactly when it is empty (the player has to pass).
pub trait MoveSource {
    fn select_move(&mut self, board: &Board, player: Player, legal: &[Location]) -> Option<Location>;

    /// Short name for logs and game records.
    fn name(&self) -> String;
}

/// The strength of a built-in opponent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    /// A uniformly random legal move.
    #[default]
    Easy,
    /// Take a corner if possible, otherwise flip as many discs as possible.
    Medium,
    /// Fixed-depth minimax on the heuristic evaluation.
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Look up a difficulty by name, ignoring case. Unknown names fall back to [`Difficulty::Easy`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for Difficulty {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.name().to_string()
    }
}

/// Pick a uniformly random move.
pub fn random_move<R: Rng>(legal: &[Location], rng: &mut R) -> Option<Location> {
    legal.choose(rng).copied()
}

/// Pick a corner if one is legal (top-left, top-right, bottom-left, bottom-right first),
/// otherwise a random move among those flipping the most discs.
pub fn greedy_move<R: Rng>(
    board: &Board,
    player: Player,
    legal: &[Location],
    rng: &mut R,
) -> Option<Location> {
    if let Some(&corner) = board.corners().iter().find(|corner| legal.contains(corner)) {
        return Some(corner);
    }

    let flips = legal
        .iter()
        .map(|&mv| (mv, board.flip_count(mv, player)))
        .collect_vec();
    let most = flips.iter().map(|&(_, count)| count).max()?;
    let best = flips
        .into_iter()
        .filter(|&(_, count)| count == most)
        .map(|(mv, _)| mv)
        .collect_vec();
    best.choose(rng).copied()
}

/// Uniform-random play.
#[derive(Debug, Clone)]
pub struct RandomSelector<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MoveSource for RandomSelector<R> {
    fn select_move(&mut self, _: &Board, _: Player, legal: &[Location]) -> Option<Location> {
        random_move(legal, &mut self.rng)
    }

    fn name(&self) -> String {
        Difficulty::Easy.to_string()
    }
}

/// Corner-first, then most-flips play. Ties are broken randomly.
#[derive(Debug, Clone)]
pub struct GreedySelector<R = StdRng> {
    rng: R,
}

impl<R: Rng> GreedySelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MoveSource for GreedySelector<R> {
    fn select_move(&mut self, board: &Board, player: Player, legal: &[Location]) -> Option<Location> {
        greedy_move(board, player, legal, &mut self.rng)
    }

    fn name(&self) -> String {
        Difficulty::Medium.to_string()
    }
}

/// Deterministic minimax play.
#[derive(Debug, Clone)]
pub struct MinimaxSelector<E = Heuristic> {
    pub options: SearchOptions,
    pub evaluator: E,
}

impl<E: Evaluator> MinimaxSelector<E> {
    pub fn new(options: SearchOptions, evaluator: E) -> Self {
        Self { options, evaluator }
    }
}

impl Default for MinimaxSelector {
    fn default() -> Self {
        Self::new(SearchOptions::default(), Heuristic::default())
    }
}

impl<E: Evaluator> MoveSource for MinimaxSelector<E> {
    fn select_move(&mut self, board: &Board, player: Player, legal: &[Location]) -> Option<Location> {
        search::best_move_among(board, player, legal, &self.options, &self.evaluator)
            .map(|result| result.best)
    }

    fn name(&self) -> String {
        Difficulty::Hard.to_string()
    }
}

/// One of the built-in strategies, chosen by [`Difficulty`].
#[derive(Debug, Clone)]
pub enum MoveSelector<R = StdRng> {
    Random(RandomSelector<R>),
    Greedy(GreedySelector<R>),
    Minimax(MinimaxSelector),
}

impl MoveSelector {
    /// Build the strategy for `difficulty` with default search settings and a fresh random seed.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_options(
            difficulty,
            SearchOptions::default(),
            Heuristic::default(),
            StdRng::from_entropy(),
        )
    }
}

impl<R: Rng> MoveSelector<R> {
    pub fn with_options(
        difficulty: Difficulty,
        options: SearchOptions,
        heuristic: Heuristic,
        rng: R,
    ) -> Self {
        match difficulty {
            Difficulty::Easy => Self::Random(RandomSelector::new(rng)),
            Difficulty::Medium => Self::Greedy(GreedySelector::new(rng)),
            Difficulty::Hard => Self::Minimax(MinimaxSelector::new(options, heuristic)),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            MoveSelector::Random(_) => Difficulty::Easy,
            MoveSelector::Greedy(_) => Difficulty::Medium,
            MoveSelector::Minimax(_) => Difficulty::Hard,
        }
    }
}

impl<R: Rng> MoveSource for MoveSelector<R> {
    fn select_move(&mut self, board: &Board, player: Player, legal: &[Location]) -> Option<Location> {
        match self {
            MoveSelector::Random(selector) => selector.select_move(board, player, legal),
            MoveSelector::Greedy(selector) => selector.select_move(board, player, legal),
            MoveSelector::Minimax(selector) => selector.select_move(board, player, legal),
        }
    }

    fn name(&self) -> String {
        self.difficulty().to_string()
    }
}

/// Pick a move for `player` at `difficulty`, or None if `player` has to pass.
pub fn choose_move<R: Rng>(
    board: &Board,
    player: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Location> {
    let legal = board.valid_moves(player);
    match difficulty {
        Difficulty::Easy => random_move(&legal, rng),
        Difficulty::Medium => greedy_move(board, player, &legal, rng),
        Difficulty::Hard => MinimaxSelector::default().select_move(board, player, &legal),
    }
}
