//! Letter-grid captcha
//!
//! Builds the spatial puzzle shown by the gate and checks answers against it.
//!
//! # Core Concepts
//!
//! - [`PuzzleGenerator`]: places a target letter around a random center and
//!   blanks exactly one of those neighbors; the blank is the answer
//! - [`StyleRandomizer`]: cosmetic per-cell parameters (rotation, colour, hop)
//! - [`AnswerValidator`]: normalizes and checks a submitted `col-row` string
//! - [`pick_example`]: a worked example letter used to explain coordinates
//! - [`CaptchaView`]: everything a renderer needs, without the answer
//!
//! # Example
//!
//! ```rust,ignore
//! use gate_puzzle::{AnswerValidator, PuzzleConfig, PuzzleGenerator};
//! use rand::SeedableRng;
//!
//! let generator = PuzzleGenerator::new(PuzzleConfig::default())?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let puzzle = generator.generate(&mut rng);
//!
//! let validator = AnswerValidator::default();
//! assert!(validator.check(puzzle.answer(), puzzle.answer()).is_correct());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod answer;
mod error;
mod example;
mod generator;
mod grid;
mod style;
mod view;

pub use answer::{normalize, AnswerValidator, Verdict};
pub use error::PuzzleError;
pub use example::{pick_example, CoordinateExample};
pub use generator::{Layout, Puzzle, PuzzleConfig, PuzzleGenerator, ALPHABET, RANDOM_LETTER_CHANCE};
pub use grid::{Cell, Grid, Position, GRID_SIZE, MAX_COORDINATE, MIN_COORDINATE};
pub use style::{CellStyle, StyleRange, StyleRanges, StyleRandomizer};
pub use view::CaptchaView;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
