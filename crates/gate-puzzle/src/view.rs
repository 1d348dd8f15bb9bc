//! Data handed to the captcha renderer

use crate::example::{pick_example, CoordinateExample};
use crate::generator::Puzzle;
use crate::grid::{Grid, MIN_COORDINATE};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Everything needed to draw the captcha page. Never contains the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptchaView {
    pub grid: Grid,
    pub game_letter: char,
    pub size: usize,
    pub min_coord: usize,
    pub max_coord: usize,
    pub message: Option<String>,
    pub example: Option<CoordinateExample>,
    pub short_instruction: String,
}

impl CaptchaView {
    /// Assemble the view for `puzzle`, picking a worked example
    pub fn prepare<R: Rng + ?Sized>(puzzle: &Puzzle, rng: &mut R) -> Self {
        let grid = puzzle.grid().clone();
        let game_letter = puzzle.game_letter();
        let example = pick_example(&grid, game_letter, rng);
        Self::from_parts(grid, game_letter, example)
    }

    #[must_use]
    pub fn from_parts(grid: Grid, game_letter: char, example: Option<CoordinateExample>) -> Self {
        let size = grid.size();
        Self {
            grid,
            game_letter,
            size,
            min_coord: MIN_COORDINATE,
            max_coord: size,
            message: None,
            example,
            short_instruction: format!("Find the appropriate box for the letter '{game_letter}'"),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
