//! Grid, cells and coordinates
//!
//! Internally positions are 0-indexed `(row, col)`. Users see 1-indexed
//! `col-row` strings, column first.

use crate::error::PuzzleError;
use crate::style::CellStyle;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Side length of the default grid
pub const GRID_SIZE: usize = 8;
/// Smallest user-facing coordinate
pub const MIN_COORDINATE: usize = 1;
/// Largest user-facing coordinate on the default grid
pub const MAX_COORDINATE: usize = GRID_SIZE;

/// 0-indexed grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Up, down, left, right; `None` where the neighbor would leave the grid
    #[must_use]
    pub fn cardinal_neighbors(self, size: usize) -> [Option<Position>; 4] {
        let inside = |p: Position| (p.row < size && p.col < size).then_some(p);
        [
            self.row.checked_sub(1).map(|r| Position::new(r, self.col)).and_then(inside),
            inside(Position::new(self.row + 1, self.col)),
            self.col.checked_sub(1).map(|c| Position::new(self.row, c)).and_then(inside),
            inside(Position::new(self.row, self.col + 1)),
        ]
    }

    /// Neighbors of `self` that lie inside a `size`-wide grid
    #[must_use]
    pub fn valid_edges(self, size: usize) -> Vec<Position> {
        self.cardinal_neighbors(size).into_iter().flatten().collect()
    }

    #[inline]
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// 1-indexed `col-row` form shown to and typed by users
    #[must_use]
    pub fn to_coordinate(self) -> String {
        format!("{}-{}", self.col + 1, self.row + 1)
    }

    /// Parse a 1-indexed `col-row` string back into a position
    ///
    /// # Errors
    /// - `PuzzleError::MalformedCoordinate` if the text is not two numbers
    ///   separated by `-`
    /// - `PuzzleError::OutOfBounds` if either number is outside `1..=size`
    pub fn from_coordinate(text: &str, size: usize) -> Result<Self, PuzzleError> {
        let malformed = || PuzzleError::MalformedCoordinate(text.to_string());
        let (col, row) = text.split_once('-').ok_or_else(malformed)?;
        let col: usize = col.parse().map_err(|_| malformed())?;
        let row: usize = row.parse().map_err(|_| malformed())?;
        if !(1..=size).contains(&col) || !(1..=size).contains(&row) {
            return Err(PuzzleError::OutOfBounds { col, row, size });
        }
        Ok(Self::new(row - 1, col - 1))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One grid cell: an optional letter and its style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub letter: Option<char>,
    pub style: CellStyle,
}

impl Cell {
    #[inline]
    #[must_use]
    pub const fn empty(style: CellStyle) -> Self {
        Self { letter: None, style }
    }

    #[inline]
    #[must_use]
    pub const fn with_letter(letter: char, style: CellStyle) -> Self {
        Self {
            letter: Some(letter),
            style,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letter.is_none()
    }
}

/// Square matrix of cells, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Build a grid whose every cell is empty with a style from `style`
    pub fn filled_with(size: usize, mut style: impl FnMut() -> CellStyle) -> Self {
        let rows = (0..size)
            .map(|_| (0..size).map(|_| Cell::empty(style())).collect())
            .collect();
        Self { size, rows }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    #[inline]
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col))
    }

    /// Replace the cell at `pos`; out-of-bounds writes are ignored
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(pos.row).and_then(|row| row.get_mut(pos.col)) {
            *slot = cell;
        }
    }

    #[inline]
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Every position with its cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (Position::new(r, c), cell))
        })
    }

    #[must_use]
    pub fn count_letter(&self, letter: char) -> usize {
        self.cells().filter(|(_, cell)| cell.letter == Some(letter)).count()
    }
}
