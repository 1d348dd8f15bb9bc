//! Puzzle generation
//!
//! A target letter is placed on the cardinal neighbors of a random center,
//! then one neighbor is blanked. The blank is the only answer: users find it
//! by its adjacency to the center, not by letter scarcity, so decoys may
//! repeat the target letter elsewhere on the grid.
//!
//! Generation is split in two so callers (and tests) can fix the layout:
//! 1. [`PuzzleGenerator::choose_layout`] draws center, letter and blank
//! 2. [`PuzzleGenerator::assemble`] fills the grid around that layout

use crate::error::PuzzleError;
use crate::grid::{Cell, Grid, Position, GRID_SIZE};
use crate::style::{StyleRandomizer, StyleRanges};
use rand::Rng;

/// Letters a puzzle draws from
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Percent chance an unrelated empty cell receives a decoy letter
pub const RANDOM_LETTER_CHANCE: u8 = 30;

/// Generator configuration
#[derive(Debug, Clone)]
pub struct PuzzleConfig {
    /// Side length of the grid
    pub grid_size: usize,
    /// Decoy probability, percent
    pub random_letter_chance: u8,
    /// Cosmetic style ranges
    pub style_ranges: StyleRanges,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            random_letter_chance: RANDOM_LETTER_CHANCE,
            style_ranges: StyleRanges::default(),
        }
    }
}

impl PuzzleConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_random_letter_chance(mut self, percent: u8) -> Self {
        self.random_letter_chance = percent;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_style_ranges(mut self, ranges: StyleRanges) -> Self {
        self.style_ranges = ranges;
        self
    }

    /// Check the configuration can produce well-formed puzzles
    ///
    /// # Errors
    /// - `PuzzleError::GridSize` outside `3..=9`: a center needs a ring of
    ///   neighbors, and answers must stay one digit per axis
    /// - `PuzzleError::LetterChance` above 100
    /// - `PuzzleError::StyleRange` for inverted ranges
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if !(3..=9).contains(&self.grid_size) {
            return Err(PuzzleError::GridSize(self.grid_size));
        }
        if self.random_letter_chance > 100 {
            return Err(PuzzleError::LetterChance(self.random_letter_chance));
        }
        self.style_ranges.validate()
    }
}

/// Where the target letters go and which neighbor is blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub center: Position,
    pub game_letter: char,
    pub blank: Position,
}

/// A generated puzzle
#[derive(Debug, Clone)]
pub struct Puzzle {
    grid: Grid,
    game_letter: char,
    answer: String,
    center: Position,
}

impl Puzzle {
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    #[must_use]
    pub fn game_letter(&self) -> char {
        self.game_letter
    }

    /// 1-indexed `col-row` of the blanked neighbor
    #[inline]
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Position {
        self.center
    }

    /// Split into grid, target letter and answer
    #[must_use]
    pub fn into_parts(self) -> (Grid, char, String) {
        (self.grid, self.game_letter, self.answer)
    }
}

/// Builds puzzles from a random source
#[derive(Debug, Clone)]
pub struct PuzzleGenerator {
    config: PuzzleConfig,
    styles: StyleRandomizer,
}

impl PuzzleGenerator {
    /// Create a generator after validating `config`
    pub fn new(config: PuzzleConfig) -> Result<Self, PuzzleError> {
        config.validate()?;
        let styles = StyleRandomizer::new(config.style_ranges)?;
        Ok(Self { config, styles })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn styles(&self) -> &StyleRandomizer {
        &self.styles
    }

    /// Generate a fresh puzzle
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Puzzle {
        let layout = self.choose_layout(rng);
        let puzzle = self.fill(layout, rng);
        tracing::debug!(
            center = %puzzle.center,
            letter = %puzzle.game_letter,
            "generated puzzle"
        );
        puzzle
    }

    /// Draw a center inset from the border, a target letter, and the
    /// neighbor that will be blanked
    pub fn choose_layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Layout {
        let n = self.config.grid_size;
        let col = rng.gen_range(1..n - 1);
        let row = rng.gen_range(1..n - 1);
        let center = Position::new(row, col);
        let game_letter = random_letter(rng);

        // An inset center always has all four neighbors.
        let edges = center.valid_edges(n);
        let blank = edges[rng.gen_range(0..edges.len())];

        Layout {
            center,
            game_letter,
            blank,
        }
    }

    /// Fill a grid around a caller-chosen layout
    ///
    /// # Errors
    /// `PuzzleError::InvalidLayout` when the center is on the border, the
    /// letter is not `A..=Z`, or the blank is not a neighbor of the center.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        layout: Layout,
        rng: &mut R,
    ) -> Result<Puzzle, PuzzleError> {
        let n = self.config.grid_size;
        let Layout {
            center,
            game_letter,
            blank,
        } = layout;
        if center.row == 0 || center.col == 0 || center.row >= n - 1 || center.col >= n - 1 {
            return Err(PuzzleError::InvalidLayout("center must be inset from the border"));
        }
        if !game_letter.is_ascii_uppercase() {
            return Err(PuzzleError::InvalidLayout("game letter must be A-Z"));
        }
        if !center.is_adjacent(blank) {
            return Err(PuzzleError::InvalidLayout("blank must neighbor the center"));
        }
        Ok(self.fill(layout, rng))
    }

    fn fill<R: Rng + ?Sized>(&self, layout: Layout, rng: &mut R) -> Puzzle {
        let n = self.config.grid_size;
        let Layout {
            center,
            game_letter,
            blank,
        } = layout;

        let mut grid = Grid::filled_with(n, || self.styles.style(rng));

        let edges = center.valid_edges(n);
        for &edge in &edges {
            grid.set(edge, Cell::with_letter(game_letter, self.styles.style(rng)));
        }

        let center_cell = if rng.gen_bool(0.5) {
            Cell::empty(self.styles.style(rng))
        } else {
            let letter = loop {
                let candidate = random_letter(rng);
                if candidate != game_letter {
                    break candidate;
                }
            };
            Cell::with_letter(letter, self.styles.style(rng))
        };
        grid.set(center, center_cell);

        grid.set(blank, Cell::empty(self.styles.style(rng)));

        self.place_decoys(&mut grid, center, &edges, rng);

        Puzzle {
            grid,
            game_letter,
            answer: blank.to_coordinate(),
            center,
        }
    }

    fn place_decoys<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        center: Position,
        edges: &[Position],
        rng: &mut R,
    ) {
        let n = grid.size();
        for row in 0..n {
            for col in 0..n {
                let pos = Position::new(row, col);
                if pos == center || edges.contains(&pos) {
                    continue;
                }
                let empty = grid.get(pos).is_some_and(Cell::is_empty);
                if empty && rng.gen_range(0..100) < self.config.random_letter_chance {
                    grid.set(pos, Cell::with_letter(random_letter(rng), self.styles.style(rng)));
                }
            }
        }
    }
}

fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator() -> PuzzleGenerator {
        PuzzleGenerator::new(PuzzleConfig::default()).unwrap()
    }

    #[test]
    fn config_rejects_tiny_and_huge_grids() {
        assert_eq!(
            PuzzleConfig::new().with_grid_size(2).validate(),
            Err(PuzzleError::GridSize(2))
        );
        assert_eq!(
            PuzzleConfig::new().with_grid_size(10).validate(),
            Err(PuzzleError::GridSize(10))
        );
        assert!(PuzzleConfig::new().with_grid_size(3).validate().is_ok());
    }

    #[test]
    fn config_rejects_chance_above_100() {
        let err = PuzzleGenerator::new(PuzzleConfig::new().with_random_letter_chance(101)).unwrap_err();
        assert_eq!(err, PuzzleError::LetterChance(101));
    }

    #[test]
    fn same_seed_same_puzzle() {
        let g = generator();
        let a = g.generate(&mut StdRng::seed_from_u64(99));
        let b = g.generate(&mut StdRng::seed_from_u64(99));
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.answer(), b.answer());
        assert_eq!(a.game_letter(), b.game_letter());
    }

    #[test]
    fn layout_center_is_inset() {
        let g = generator();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let layout = g.choose_layout(&mut rng);
            assert!((1..=6).contains(&layout.center.row));
            assert!((1..=6).contains(&layout.center.col));
            assert!(layout.center.is_adjacent(layout.blank));
        }
    }

    #[test]
    fn assemble_rejects_bad_layouts() {
        let g = generator();
        let mut rng = StdRng::seed_from_u64(1);
        let border = Layout {
            center: Position::new(0, 3),
            game_letter: 'K',
            blank: Position::new(1, 3),
        };
        assert!(g.assemble(border, &mut rng).is_err());

        let far_blank = Layout {
            center: Position::new(3, 3),
            game_letter: 'K',
            blank: Position::new(5, 5),
        };
        assert!(g.assemble(far_blank, &mut rng).is_err());

        let lowercase = Layout {
            center: Position::new(3, 3),
            game_letter: 'k',
            blank: Position::new(3, 4),
        };
        assert!(g.assemble(lowercase, &mut rng).is_err());
    }

    #[test]
    fn no_decoys_when_chance_is_zero() {
        let g = PuzzleGenerator::new(PuzzleConfig::new().with_random_letter_chance(0)).unwrap();
        let puzzle = g.generate(&mut StdRng::seed_from_u64(8));
        let lettered = puzzle.grid().cells().filter(|(_, c)| !c.is_empty()).count();
        // three remaining neighbors, plus the center when it holds a letter
        assert!(lettered == 3 || lettered == 4, "got {lettered}");
    }

    #[test]
    fn small_grid_has_single_center() {
        let g = PuzzleGenerator::new(PuzzleConfig::new().with_grid_size(3)).unwrap();
        let puzzle = g.generate(&mut StdRng::seed_from_u64(2));
        assert_eq!(puzzle.center(), Position::new(1, 1));
    }
}
