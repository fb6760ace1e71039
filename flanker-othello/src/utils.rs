//! Miscellaneous project utilities.

use std::fmt::{self, Formatter};
use std::iter::Iterator;

const COLUMN_LABELS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Format `size * size` characters into a labelled grid.
/// `piece_iter` must yield exactly `size * size` items.
pub fn format_grid<T: Iterator<Item = char>>(
    mut piece_iter: T,
    size: usize,
    f: &mut Formatter,
) -> fmt::Result {
    write!(f, "  ")?;
    for label in COLUMN_LABELS.chars().take(size) {
        write!(f, " {}", label)?;
    }

    for row in 0..size {
        write!(f, "\n{:>2} ", row + 1)?;
        for _ in 0..size {
            write!(f, "{} ", piece_iter.next().ok_or(fmt::Error)?)?;
        }
    }

    match piece_iter.next() {
        None => Ok(()),
        _ => Err(fmt::Error),
    }
}
