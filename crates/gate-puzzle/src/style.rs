//! Cosmetic cell styling
//!
//! Every cell, empty or not, carries six floats a renderer turns into a
//! rotation, an HSL colour and a hop animation. None of it affects the answer.

use crate::error::PuzzleError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` range a style value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleRange {
    pub min: f64,
    pub max: f64,
}

impl StyleRange {
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a value uniformly from the range. A collapsed (or unvalidated,
    /// inverted) range always yields `min`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min < self.max {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), PuzzleError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(PuzzleError::StyleRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Ranges for all six style attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleRanges {
    /// Degrees
    pub rotation: StyleRange,
    /// Degrees on the colour wheel
    pub hue: StyleRange,
    /// Percent
    pub saturation: StyleRange,
    /// Percent
    pub lightness: StyleRange,
    /// Seconds
    pub hop_duration: StyleRange,
    /// Seconds
    pub hop_delay: StyleRange,
}

impl Default for StyleRanges {
    fn default() -> Self {
        Self {
            rotation: StyleRange::new(-10.0, 10.0),
            hue: StyleRange::new(0.0, 360.0),
            saturation: StyleRange::new(70.0, 100.0),
            lightness: StyleRange::new(60.0, 80.0),
            hop_duration: StyleRange::new(1.5, 2.5),
            hop_delay: StyleRange::new(0.0, 2.0),
        }
    }
}

impl StyleRanges {
    /// Reject inverted or non-finite ranges
    pub fn validate(&self) -> Result<(), PuzzleError> {
        self.rotation.validate("rotation")?;
        self.hue.validate("hue")?;
        self.saturation.validate("saturation")?;
        self.lightness.validate("lightness")?;
        self.hop_duration.validate("hop_duration")?;
        self.hop_delay.validate("hop_delay")
    }

    /// Whether every value of `style` lies inside its range
    #[must_use]
    pub fn admits(&self, style: &CellStyle) -> bool {
        self.rotation.contains(style.rotation)
            && self.hue.contains(style.hue)
            && self.saturation.contains(style.saturation)
            && self.lightness.contains(style.lightness)
            && self.hop_duration.contains(style.hop_duration)
            && self.hop_delay.contains(style.hop_delay)
    }
}

/// Style parameters of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellStyle {
    pub rotation: f64,
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub hop_duration: f64,
    pub hop_delay: f64,
}

/// Draws fresh [`CellStyle`]s from a set of ranges
#[derive(Debug, Clone, Default)]
pub struct StyleRandomizer {
    ranges: StyleRanges,
}

impl StyleRandomizer {
    /// Create a randomizer, rejecting invalid ranges
    pub fn new(ranges: StyleRanges) -> Result<Self, PuzzleError> {
        ranges.validate()?;
        Ok(Self { ranges })
    }

    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &StyleRanges {
        &self.ranges
    }

    /// Each attribute is drawn independently.
    pub fn style<R: Rng + ?Sized>(&self, rng: &mut R) -> CellStyle {
        CellStyle {
            rotation: self.ranges.rotation.sample(rng),
            hue: self.ranges.hue.sample(rng),
            saturation: self.ranges.saturation.sample(rng),
            lightness: self.ranges.lightness.sample(rng),
            hop_duration: self.ranges.hop_duration.sample(rng),
            hop_delay: self.ranges.hop_delay.sample(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_ranges_are_valid() {
        assert!(StyleRanges::default().validate().is_ok());
    }

    #[test]
    fn inverted_range_rejected() {
        let ranges = StyleRanges {
            hue: StyleRange::new(360.0, 0.0),
            ..StyleRanges::default()
        };
        let err = StyleRandomizer::new(ranges).unwrap_err();
        assert!(matches!(err, PuzzleError::StyleRange { name: "hue", .. }));
    }

    #[test]
    fn nan_bound_rejected() {
        let ranges = StyleRanges {
            hop_delay: StyleRange::new(0.0, f64::NAN),
            ..StyleRanges::default()
        };
        assert!(ranges.validate().is_err());
    }

    #[test]
    fn sampled_styles_stay_in_range() {
        let randomizer = StyleRandomizer::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let style = randomizer.style(&mut rng);
            assert!(randomizer.ranges().admits(&style), "{style:?}");
        }
    }

    #[test]
    fn degenerate_range_yields_constant() {
        let range = StyleRange::new(1.5, 1.5);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(range.sample(&mut rng), 1.5);
    }

    #[test]
    fn inverted_range_does_not_panic() {
        let range = StyleRange::new(4.0, 2.0);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(range.sample(&mut rng), 4.0);
    }

    #[test]
    fn narrow_range_samples_spread_within_bounds() {
        let range = StyleRange::new(-0.5, 0.5);
        let mut rng = StdRng::seed_from_u64(8);
        let samples: Vec<f64> = (0..200).map(|_| range.sample(&mut rng)).collect();
        assert!(samples.iter().all(|v| range.contains(*v)));
        assert!(samples.iter().any(|v| *v < 0.0));
        assert!(samples.iter().any(|v| *v > 0.0));
    }
}
