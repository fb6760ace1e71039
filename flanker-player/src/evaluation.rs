//! Static evaluation of Othello positions.

use flanker_othello::{Board, Cell, Player};
use serde::{Deserialize, Serialize};

/// A static evaluation function: scores a board from one player's point of view without lookahead.
///
/// Higher is better for `player`. Scores are only comparable within one search.
pub trait Evaluator: Sync {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Weights of the terms of the [`Heuristic`] evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Value of owning one corner (negative for each opponent corner).
    pub corner: i32,
    /// Multiplier on the disc difference.
    pub disc: i32,
    /// Multiplier on the legal-move difference.
    pub mobility: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            corner: 25,
            disc: 2,
            mobility: 3,
        }
    }
}

/// Corner occupancy, disc difference and mobility, summed with [`Weights`].
///
/// Corners can never be flipped back, so with the default weights they dominate the other terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Heuristic {
    pub weights: Weights,
}

impl Heuristic {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }
}

impl Evaluator for Heuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        self.weights.corner * corner_term(board, player)
            + self.weights.disc * disc_difference(board, player)
            + self.weights.mobility * mobility(board, player)
    }
}

/// # corners held by `player` - # corners held by the opponent.
pub fn corner_term(board: &Board, player: Player) -> i32 {
    board
        .corners()
        .iter()
        .map(|&corner| match board.get(corner).and_then(Cell::player) {
            Some(owner) if owner == player => 1,
            Some(_) => -1,
            None => 0,
        })
        .sum()
}

/// # `player` discs - # opponent discs.
pub fn disc_difference(board: &Board, player: Player) -> i32 {
    board.count(player) as i32 - board.count(!player) as i32
}

/// # `player` legal moves - # opponent legal moves.
// Two full move generations per call: this is the expensive term.
pub fn mobility(board: &Board, player: Player) -> i32 {
    board.valid_moves(player).len() as i32 - board.valid_moves(!player).len() as i32
}
