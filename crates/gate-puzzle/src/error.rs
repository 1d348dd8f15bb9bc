//! Error types for puzzle configuration and coordinate parsing

/// Errors raised while configuring the generator or reading coordinates
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PuzzleError {
    /// Grid too small to inset a center, or too large for one-digit answers
    #[error("grid size {0} out of range (expected 3..=9)")]
    GridSize(usize),

    /// A style range with `min > max` or a non-finite bound
    #[error("style range `{name}` is invalid: [{min}, {max}]")]
    StyleRange {
        /// Style attribute name
        name: &'static str,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Decoy chance expressed as a percentage above 100
    #[error("random letter chance {0}% exceeds 100%")]
    LetterChance(u8),

    /// Coordinate string is not `col-row`
    #[error("malformed coordinate: {0:?}")]
    MalformedCoordinate(String),

    /// Coordinate lies outside the grid
    #[error("coordinate {col}-{row} outside a {size}x{size} grid")]
    OutOfBounds {
        /// 1-indexed column
        col: usize,
        /// 1-indexed row
        row: usize,
        /// Grid side length
        size: usize,
    },

    /// Hand-built layout violates the puzzle invariants
    #[error("invalid layout: {0}")]
    InvalidLayout(&'static str),
}
