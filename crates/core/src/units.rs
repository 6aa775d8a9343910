//! Length units for slide geometry.
//!
//! Everything on a slide is measured in EMU (English Metric Units), the
//! integer unit of Office Open XML: 914 400 EMU per inch, 12 700 per point.
//! Geometry code only ever sees [`Length`], so it can be tested without
//! touching the package writer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_CM: i64 = 360_000;

/// A signed distance in EMU.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Length(i64);

impl Length {
    pub const ZERO: Self = Self(0);

    /// Create a length from raw EMU.
    pub const fn from_emu(emu: i64) -> Self {
        Self(emu)
    }

    pub fn from_inches(inches: f64) -> Self {
        Self((inches * EMUS_PER_INCH as f64).round() as i64)
    }

    pub fn from_points(points: f64) -> Self {
        Self((points * EMUS_PER_PT as f64).round() as i64)
    }

    pub fn from_cm(cm: f64) -> Self {
        Self((cm * EMUS_PER_CM as f64).round() as i64)
    }

    /// Raw EMU value.
    pub const fn emu(self) -> i64 {
        self.0
    }

    pub fn to_inches(self) -> f64 {
        self.0 as f64 / EMUS_PER_INCH as f64
    }

    pub fn to_points(self) -> f64 {
        self.0 as f64 / EMUS_PER_PT as f64
    }

    /// Multiply by a ratio, truncating toward zero.
    pub fn scale(self, factor: f64) -> Self {
        Self((self.0 as f64 * factor) as i64)
    }

    pub fn half(self) -> Self {
        Self(self.0 / 2)
    }

    /// Clamp negative lengths to zero.
    pub fn non_negative(self) -> Self {
        Self(self.0.max(0))
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Add for Length {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<i64> for Length {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<i64> for Length {
    type Output = Self;

    fn div(self, rhs: i64) -> Self {
        Self(self.0 / rhs)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}in", self.to_inches())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_conversion() {
        assert_eq!(Length::from_inches(1.0).emu(), 914_400);
        assert_eq!(Length::from_inches(0.4).emu(), 365_760);
        assert_eq!(Length::from_inches(10.0).emu(), 9_144_000);
        assert!((Length::from_emu(1_371_600).to_inches() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_point_conversion() {
        assert_eq!(Length::from_points(18.0).emu(), 228_600);
        assert!((Length::from_points(18.0).to_points() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_cm_conversion() {
        assert_eq!(Length::from_cm(2.54), Length::from_inches(1.0));
    }

    #[test]
    fn test_scale_truncates() {
        assert_eq!(Length::from_emu(9_144_000).scale(0.55).emu(), 5_029_200);
        assert_eq!(Length::from_emu(3).scale(0.5).emu(), 1);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Length::from_emu(-5).non_negative(), Length::ZERO);
        assert_eq!(Length::from_emu(5).non_negative().emu(), 5);
    }

    #[test]
    fn test_display_in_inches() {
        assert_eq!(Length::from_inches(1.5).to_string(), "1.50in");
    }
}
