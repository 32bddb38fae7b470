//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole-number value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Converts a mean fraction (0.0 to 1.0) to the nearest whole percent.
    ///
    /// Non-finite input maps to zero; out-of-range input is clamped.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() {
            return Self::ZERO;
        }
        let rounded = (fraction.clamp(0.0, 1.0) * 100.0).round();
        Self(rounded as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(50).value(), 50);
        assert_eq!(Percentage::new(101).value(), 100);
    }

    #[test]
    fn from_fraction_rounds_to_nearest() {
        assert_eq!(Percentage::from_fraction(0.75).value(), 75);
        assert_eq!(Percentage::from_fraction(0.333).value(), 33);
        assert_eq!(Percentage::from_fraction(0.666).value(), 67);
        assert_eq!(Percentage::from_fraction(0.005).value(), 1);
    }

    #[test]
    fn from_fraction_handles_bounds_and_nan() {
        assert_eq!(Percentage::from_fraction(1.0), Percentage::HUNDRED);
        assert_eq!(Percentage::from_fraction(-0.2), Percentage::ZERO);
        assert_eq!(Percentage::from_fraction(3.0), Percentage::HUNDRED);
        assert_eq!(Percentage::from_fraction(f64::NAN), Percentage::ZERO);
    }

    #[test]
    fn percentage_displays_correctly() {
        assert_eq!(format!("{}", Percentage::new(75)), "75%");
        assert_eq!(format!("{}", Percentage::ZERO), "0%");
    }

    #[test]
    fn percentage_serializes_to_json() {
        let json = serde_json::to_string(&Percentage::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
