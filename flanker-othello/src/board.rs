//! The Othello board: a square grid of discs and the flip rules.
//!
//! Every query fails closed. Off-board or occupied locations are never legal moves,
//! and applying an illegal move changes nothing and reports no flips.
//! By convention, row 0 is the top of the board and iteration is row-major.

use crate::game::Player;
use crate::location::Location;
use crate::{utils, DIRECTIONS, EDGE_LENGTH, MAX_EDGE_LENGTH, MIN_EDGE_LENGTH};
use derive_more::{Display, Error};
use std::fmt;

/// The contents of a single space on the board.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The player whose disc is here, if any.
    #[inline]
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    #[display(
        fmt = "invalid board size {}: must be even and between {} and {}",
        size,
        MIN_EDGE_LENGTH,
        MAX_EDGE_LENGTH
    )]
    InvalidSize { size: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum ParseBoardError {
    #[display(fmt = "unknown board character {:?}", _0)]
    UnknownCell(#[error(not(source))] char),
    #[display(fmt = "{} spaces do not form a valid square board", _0)]
    BadSpaceCount(#[error(not(source))] usize),
}

/// A square Othello board.
///
/// The edge length is fixed at construction. Cloning makes a fully independent copy,
/// which is how search explores hypothetical positions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    grid: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard 8x8 starting position.
    pub fn new() -> Self {
        Self::opening(EDGE_LENGTH)
    }

    /// The starting position on a board with edge length `size`.
    pub fn with_size(size: usize) -> Result<Self, BoardError> {
        Self::check_size(size)?;
        Ok(Self::opening(size))
    }

    /// Check that `size` is a supported edge length.
    pub fn check_size(size: usize) -> Result<(), BoardError> {
        if size % 2 == 0 && (MIN_EDGE_LENGTH..=MAX_EDGE_LENGTH).contains(&size) {
            Ok(())
        } else {
            Err(BoardError::InvalidSize { size })
        }
    }

    /// Four discs on the central diagonals: white on the main diagonal, black on the other.
    fn opening(size: usize) -> Self {
        let mut board = Self {
            size,
            grid: vec![Cell::Empty; size * size],
        };
        let mid = size / 2;
        board.set(Location::new(mid - 1, mid - 1), Cell::White);
        board.set(Location::new(mid, mid), Cell::White);
        board.set(Location::new(mid - 1, mid), Cell::Black);
        board.set(Location::new(mid, mid - 1), Cell::Black);
        board
    }

    #[inline]
    fn set(&mut self, loc: Location, cell: Cell) {
        let index = loc.to_index(self.size);
        self.grid[index] = cell;
    }

    /// The edge length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether `loc` is on the board.
    #[inline]
    pub fn contains(&self, loc: Location) -> bool {
        loc.row < self.size && loc.col < self.size
    }

    /// Get the contents of `loc`, or None if it is off the board.
    #[inline]
    pub fn get(&self, loc: Location) -> Option<Cell> {
        if self.contains(loc) {
            Some(self.grid[loc.to_index(self.size)])
        } else {
            None
        }
    }

    /// Iterate over every location and its contents in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Location, Cell)> + '_ {
        let size = self.size;
        self.grid
            .iter()
            .enumerate()
            .map(move |(index, &cell)| (Location::from_index(index, size), cell))
    }

    /// The four corners: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Location; 4] {
        let last = self.size - 1;
        [
            Location::new(0, 0),
            Location::new(0, last),
            Location::new(last, 0),
            Location::new(last, last),
        ]
    }

    /// Count the discs belonging to `player`.
    pub fn count(&self, player: Player) -> usize {
        let target = Cell::from(player);
        self.grid.iter().filter(|&&cell| cell == target).count()
    }

    /// Count the empty spaces.
    pub fn count_empty(&self) -> usize {
        self.grid.iter().filter(|cell| cell.is_empty()).count()
    }

    /// Returns whether no empty space remains.
    pub fn is_full(&self) -> bool {
        self.grid.iter().all(|cell| !cell.is_empty())
    }

    /// Length of the run of opponent discs starting next to `loc` in `direction`,
    /// if that run is closed off by one of `player`'s discs. Zero otherwise.
    fn flanked_run(&self, loc: Location, direction: (isize, isize), player: Player) -> usize {
        let own = Cell::from(player);
        let opponent = Cell::from(!player);

        let mut run = 0;
        let mut next = loc.offset(direction, self.size);
        while let Some(current) = next {
            let cell = self.grid[current.to_index(self.size)];
            if cell == opponent {
                run += 1;
                next = current.offset(direction, self.size);
            } else if cell == own {
                return run;
            } else {
                return 0;
            }
        }

        // Ran off the edge of the board.
        0
    }

    /// Returns whether `player` may place a disc at `loc`.
    ///
    /// A move is legal on an empty, on-board space that closes off at least one run of
    /// opponent discs in some direction.
    pub fn is_valid_move(&self, loc: Location, player: Player) -> bool {
        match self.get(loc) {
            Some(Cell::Empty) => DIRECTIONS
                .iter()
                .any(|&direction| self.flanked_run(loc, direction, player) > 0),
            _ => false,
        }
    }

    /// Count the discs `player` would flip by playing at `loc`, without playing it.
    /// Zero if the move is illegal.
    pub fn flip_count(&self, loc: Location, player: Player) -> usize {
        match self.get(loc) {
            Some(Cell::Empty) => DIRECTIONS
                .iter()
                .map(|&direction| self.flanked_run(loc, direction, player))
                .sum(),
            _ => 0,
        }
    }

    /// Place a disc for `player` at `loc` and flip every closed-off run.
    ///
    /// Returns exactly the flipped locations, direction by direction in [`DIRECTIONS`] order.
    /// An illegal move is silently ignored: the board is untouched and the list is empty.
    pub fn apply_move(&mut self, loc: Location, player: Player) -> Vec<Location> {
        if !self.is_valid_move(loc, player) {
            return Vec::new();
        }

        let mut flipped = Vec::new();
        for &direction in DIRECTIONS.iter() {
            let run = self.flanked_run(loc, direction, player);
            let mut current = loc;
            for _ in 0..run {
                // In bounds: `flanked_run` walked this same path.
                current = match current.offset(direction, self.size) {
                    Some(next) => next,
                    None => break,
                };
                flipped.push(current);
            }
        }

        let own = Cell::from(player);
        self.set(loc, own);
        for &flip in &flipped {
            self.set(flip, own);
        }

        flipped
    }

    /// Get the legal moves for `player` in row-major order.
    pub fn valid_moves(&self, player: Player) -> Vec<Location> {
        self.cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(loc, _)| loc)
            .filter(|&loc| self.is_valid_move(loc, player))
            .collect()
    }

    /// Returns whether `player` has any legal move. Stops at the first one found.
    pub fn has_valid_move(&self, player: Player) -> bool {
        self.cells()
            .any(|(loc, cell)| cell.is_empty() && self.is_valid_move(loc, player))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        utils::format_grid(self.grid.iter().map(|cell| cell.to_char()), self.size, f)
    }
}

/// Build a [`Board`] from a textual grid in row-major order.
///
/// `X`/`B` is black, `O`/`W` is white, `.`/`-` is empty; whitespace is ignored.
/// The board size is inferred from the number of spaces.
impl std::str::FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let grid: Vec<Cell> = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c.to_ascii_uppercase() {
                'X' | 'B' => Ok(Cell::Black),
                'O' | 'W' => Ok(Cell::White),
                '.' | '-' => Ok(Cell::Empty),
                other => Err(ParseBoardError::UnknownCell(other)),
            })
            .collect::<Result<_, _>>()?;

        let spaces = grid.len();
        let size = (MIN_EDGE_LENGTH..=MAX_EDGE_LENGTH)
            .find(|size| size * size == spaces)
            .ok_or(ParseBoardError::BadSpaceCount(spaces))?;
        Self::check_size(size).or(Err(ParseBoardError::BadSpaceCount(spaces)))?;

        Ok(Self { size, grid })
    }
}
