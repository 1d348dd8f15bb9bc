//! Worked example shown next to the grid
//!
//! Picks one lettered cell that is not the target letter and describes its
//! coordinates, so users can see that `X-Y` means column X, row Y.

use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An example letter and its 1-indexed position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateExample {
    pub letter: char,
    /// Column, 1-indexed
    pub x: usize,
    /// Row, 1-indexed
    pub y: usize,
    pub explanation: String,
}

impl CoordinateExample {
    #[must_use]
    pub fn new(letter: char, x: usize, y: usize) -> Self {
        Self {
            letter,
            x,
            y,
            explanation: format!(
                "It is at coordinates {x}-{y}. This represents column {x} and row {y}"
            ),
        }
    }
}

/// Choose a random non-target letter from the grid, if any exists
pub fn pick_example<R: Rng + ?Sized>(
    grid: &Grid,
    game_letter: char,
    rng: &mut R,
) -> Option<CoordinateExample> {
    let candidates: Vec<_> = grid
        .cells()
        .filter_map(|(pos, cell)| match cell.letter {
            Some(letter) if letter != game_letter => Some((pos, letter)),
            _ => None,
        })
        .collect();

    candidates
        .choose(rng)
        .map(|&(pos, letter)| CoordinateExample::new(letter, pos.col + 1, pos.row + 1))
}
