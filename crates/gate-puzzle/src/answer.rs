//! Answer validation
//!
//! Answers are compared as text. A well-formed answer is exactly one digit,
//! a `-`, and one digit, each within the grid, so two well-formed strings
//! name the same cell only when they are equal.

use crate::error::PuzzleError;
use crate::grid::GRID_SIZE;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-8]-[1-8]$").expect("static coordinate pattern"));

/// Strip embedded spaces from a submitted answer
#[must_use]
pub fn normalize(input: &str) -> String {
    input.chars().filter(|&c| c != ' ').collect()
}

/// Outcome of checking a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not a `col-row` pair inside the grid
    Malformed,
    /// Well-formed but not the blanked cell
    Incorrect,
    Correct,
}

impl Verdict {
    #[inline]
    #[must_use]
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

/// Checks `col-row` submissions for a grid of a given size
#[derive(Debug, Clone)]
pub struct AnswerValidator {
    pattern: Regex,
}

impl Default for AnswerValidator {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

impl AnswerValidator {
    /// Validator accepting digits `1..=size` on both axes
    ///
    /// # Errors
    /// `PuzzleError::GridSize` unless `size` is in `3..=9`
    pub fn for_grid(size: usize) -> Result<Self, PuzzleError> {
        if size == GRID_SIZE {
            return Ok(Self::default());
        }
        if !(3..=9).contains(&size) {
            return Err(PuzzleError::GridSize(size));
        }
        let pattern = Regex::new(&format!("^[1-{size}]-[1-{size}]$"))
            .map_err(|_| PuzzleError::GridSize(size))?;
        Ok(Self { pattern })
    }

    /// Whether `input`, after [`normalize`], is a `col-row` pair in range
    #[must_use]
    pub fn is_well_formed(&self, input: &str) -> bool {
        self.pattern.is_match(&normalize(input))
    }

    /// Exact textual comparison of a normalized answer with the stored one
    #[inline]
    #[must_use]
    pub fn is_correct(&self, normalized: &str, stored: &str) -> bool {
        normalized == stored
    }

    /// Normalize, check the format, then compare
    #[must_use]
    pub fn check(&self, input: &str, stored: &str) -> Verdict {
        let normalized = normalize(input);
        if !self.pattern.is_match(&normalized) {
            Verdict::Malformed
        } else if self.is_correct(&normalized, stored) {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_spaces_only() {
        assert_eq!(normalize("3 -4"), "3-4");
        assert_eq!(normalize(" 3 - 4 "), "3-4");
        assert_eq!(normalize("3\t-4"), "3\t-4");
    }

    #[test]
    fn well_formed_cases() {
        let v = AnswerValidator::default();
        assert!(v.is_well_formed("3-4"));
        assert!(v.is_well_formed("3 -4"));
        assert!(v.is_well_formed("1-8"));
        assert!(!v.is_well_formed("9-1"));
        assert!(!v.is_well_formed("0-1"));
        assert!(!v.is_well_formed("10-1"));
        assert!(!v.is_well_formed("03-4"));
        assert!(!v.is_well_formed("34"));
        assert!(!v.is_well_formed("3_4"));
        assert!(!v.is_well_formed("3-4x"));
        assert!(!v.is_well_formed(""));
    }

    #[test]
    fn correctness_is_textual() {
        let v = AnswerValidator::default();
        assert!(v.is_correct("5-4", "5-4"));
        assert!(!v.is_correct("4-5", "5-4"));
    }

    #[test]
    fn check_orders_format_before_comparison() {
        let v = AnswerValidator::default();
        assert_eq!(v.check("5 - 4", "5-4"), Verdict::Correct);
        assert_eq!(v.check("4-5", "5-4"), Verdict::Incorrect);
        assert_eq!(v.check("five-four", "5-4"), Verdict::Malformed);
        // a stored answer never matches a malformed submission
        assert_eq!(v.check("", ""), Verdict::Malformed);
    }

    #[test]
    fn smaller_grid_narrows_digits() {
        let v = AnswerValidator::for_grid(5).unwrap();
        assert!(v.is_well_formed("5-5"));
        assert!(!v.is_well_formed("6-1"));
        assert!(AnswerValidator::for_grid(12).is_err());
    }
}
