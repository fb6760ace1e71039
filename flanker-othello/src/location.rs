//! Code for working with [`Location`]s on the Othello board.

use crate::MAX_EDGE_LENGTH;
use derive_more::{Display, Error};
use itertools::Itertools;
use std::fmt::{self, Formatter, Write};

const COLUMN_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A location on the Othello board, as 0-indexed row and column.
///
/// Locations order row-major, which is also the order moves are generated in.
/// A location carries no board size: whether it is on a given board is checked by the board.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    /// Construct from row and column coordinates.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Get the row and column coordinates.
    #[inline]
    pub const fn to_coords(self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Convert from a row-major square index on a board with edge length `size`.
    #[inline]
    pub const fn from_index(index: usize, size: usize) -> Self {
        Self::new(index / size, index % size)
    }

    /// Convert into a row-major square index on a board with edge length `size`.
    #[inline]
    pub const fn to_index(self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Step one space in direction `(d_row, d_col)`.
    /// Returns None if that would leave a board with edge length `size`.
    #[inline]
    pub fn offset(self, (d_row, d_col): (isize, isize), size: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        if row < size && col < size {
            Some(Self::new(row, col))
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for Location {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// Convert this [`Location`] into string notation ("D3": column letter, 1-based row).
/// Columns past "Z" have no letter; those locations print as 0-based coordinates, "(0, 30)".
impl fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match COLUMN_LETTERS.chars().nth(self.col) {
            Some(col_str) => {
                f.write_char(col_str)?;
                write!(f, "{}", self.row + 1)
            }
            None => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

/// Format a list of locations as "[D3, C4, F5]".
pub fn format_locations(locations: &[Location]) -> String {
    format!("[{}]", locations.iter().join(", "))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
#[display(fmt = "invalid location string")]
pub struct ParseLocationError;

/// Build a [`Location`] from a 1-indexed string notation ("A4", "c12").
impl std::str::FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let col_str = chars.next().ok_or(ParseLocationError)?.to_ascii_uppercase();
        let col = COLUMN_LETTERS.find(col_str).ok_or(ParseLocationError)?;

        let row_str = chars.as_str();
        if row_str.is_empty() || !row_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseLocationError);
        }
        let row: usize = row_str.parse().or(Err(ParseLocationError))?;

        if row == 0 || row > MAX_EDGE_LENGTH {
            return Err(ParseLocationError);
        }

        Ok(Self::new(row - 1, col))
    }
}
