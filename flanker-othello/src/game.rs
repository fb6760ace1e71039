//! Implements game-level Othello logic: turn order, passes, scoring and the end of the game.
//!
//! [`Board`] alone enforces the flip rules; [`GameState`] decides whose turn it is.

use crate::board::Board;
use crate::location::Location;
use derive_more::{Display, Error};
use std::fmt;

/// One of the two players in a game.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    Black,
    White,
}

impl Default for Player {
    /// Gets the starting player (black).
    fn default() -> Self {
        Self::Black
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    /// Gets the other player.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
#[display(fmt = "invalid player string")]
pub struct ParsePlayerError;

impl std::str::FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "black" | "x" => Ok(Player::Black),
            "w" | "white" | "o" => Ok(Player::White),
            _ => Err(ParsePlayerError),
        }
    }
}

/// An action in an Othello game: pass or select a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    MakeMove(Location),
    Pass,
}

impl From<Location> for Action {
    fn from(mv: Location) -> Self {
        Self::MakeMove(mv)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MakeMove(loc) => loc.fmt(f),
            Action::Pass => f.write_str("PASS"),
        }
    }
}

/// Disc counts for both players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    pub black: usize,
    pub white: usize,
}

impl Score {
    /// The number of discs `player` has.
    #[inline]
    pub fn of(self, player: Player) -> usize {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Score as: # of `player`'s discs - # of opponent discs.
    #[inline]
    pub fn difference(self, player: Player) -> isize {
        self.of(player) as isize - self.of(!player) as isize
    }

    /// The player with strictly more discs, or None on a tie.
    pub fn winner(self) -> Option<Player> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Black {} - {} White", self.black, self.white)
    }
}

/// The complete state of an Othello game: a board and the player to move.
///
/// The player to move may have no legal moves without the game being over;
/// callers resolve that with [`GameState::pass_if_needed`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    current_player: Player,
}

impl Default for GameState {
    /// Gets the standard starting position with black to move.
    fn default() -> Self {
        Self::new(Board::new())
    }
}

impl GameState {
    /// Start a game on `board` with black to move.
    pub fn new(board: Board) -> Self {
        Self::with_player(board, Player::default())
    }

    /// Resume a game on `board` with `player` to move.
    pub fn with_player(board: Board, player: Player) -> Self {
        Self {
            board,
            current_player: player,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board. The only mutating board operation is [`Board::apply_move`].
    #[inline]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Hand the turn to the other player. Always succeeds.
    #[inline]
    pub fn switch_player(&mut self) {
        self.current_player = !self.current_player;
    }

    /// Get the legal moves of the player to move, in row-major order.
    pub fn valid_moves(&self) -> Vec<Location> {
        self.board.valid_moves(self.current_player)
    }

    /// Make a placement move for the player to move.
    ///
    /// Returns the flipped discs. An illegal move leaves the board and the turn unchanged
    /// and returns an empty list; a legal move always hands the turn over.
    pub fn play(&mut self, loc: Location) -> Vec<Location> {
        let flipped = self.board.apply_move(loc, self.current_player);
        if !flipped.is_empty() {
            self.switch_player();
        }
        flipped
    }

    /// True if neither player has a legal move, or no empty space remains.
    pub fn is_game_over(&self) -> bool {
        self.board.is_full()
            || (!self.board.has_valid_move(Player::Black)
                && !self.board.has_valid_move(Player::White))
    }

    /// Count the discs of each player.
    pub fn score(&self) -> Score {
        Score {
            black: self.board.count(Player::Black),
            white: self.board.count(Player::White),
        }
    }

    /// If the player to move is stuck but the opponent is not, hand the turn over.
    ///
    /// Returns true if a forced pass happened. If both players are stuck this returns false
    /// and the turn is unchanged; detect that with [`GameState::is_game_over`].
    pub fn pass_if_needed(&mut self) -> bool {
        let player = self.current_player;
        if !self.board.has_valid_move(player) && self.board.has_valid_move(!player) {
            self.switch_player();
            true
        } else {
            false
        }
    }

    /// The player with strictly more discs (None on a tie), with the disc counts.
    pub fn winner(&self) -> (Option<Player>, Score) {
        let score = self.score();
        (score.winner(), score)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "{} to move. {}", self.current_player, self.score())
    }
}
