//! `flanker-othello` is a small, exact Othello library for engines and UIs.
//!
//! This package implements two levels of abstraction:
//!
//!  - [`Board`] holds the grid of discs and implements the flip rules: move legality,
//!    move application (returning exactly the flipped discs) and legal move generation.
//!    Illegal input never panics or errors; it produces `false` or an empty result.
//!  - [`GameState`] layers turn order on top of a [`Board`]: whose turn it is, forced passes,
//!    terminal detection and scoring.
//!
//! Boards are square with an even edge length; the standard game uses [`EDGE_LENGTH`].

pub mod test_utils;

mod board;
mod game;
mod location;
mod utils;

pub use board::*;
pub use game::*;
pub use location::*;

/// The number of spaces on one edge of a standard Othello board.
pub const EDGE_LENGTH: usize = 8;

/// The number of spaces on a standard Othello board.
pub const NUM_SPACES: usize = EDGE_LENGTH * EDGE_LENGTH;

/// The smallest supported edge length.
pub const MIN_EDGE_LENGTH: usize = 4;

/// The largest supported edge length, bounded by single-letter column notation.
pub const MAX_EDGE_LENGTH: usize = 26;

/// The eight compass directions as (Δrow, Δcol): N, NE, E, SE, S, SW, W, NW.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];
