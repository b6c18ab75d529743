//! Integer money in minor units.

use core::fmt;
use core::iter::Sum;

use serde::{Deserialize, Serialize};

/// ISO 4217 code of the single currency the platform charges in.
pub const CURRENCY: &str = "INR";

/// An amount of money in paise (1/100 rupee).
///
/// All persisted amounts and all amounts sent to the payment gateway are
/// integer minor units, so arithmetic never touches floating point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Paise(i64);

impl Paise {
    /// Create an amount from a raw paise count.
    #[must_use]
    pub const fn new(paise: i64) -> Self {
        Self(paise)
    }

    /// Create an amount from whole rupees.
    #[must_use]
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    /// Get the raw paise count.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whole-rupee part of the amount.
    ///
    /// Catalog prices are entered in whole rupees, so for those this is
    /// exact.
    #[must_use]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Line total for `quantity` units at this unit price.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0 * quantity as i64)
    }
}

impl Sum for Paise {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl fmt::Display for Paise {
    /// Formats as rupees, e.g. `₹1499.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rupees = self.0 / 100;
        let frac = (self.0 % 100).abs();
        write!(f, "₹{rupees}.{frac:02}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees() {
        assert_eq!(Paise::from_rupees(1499).as_i64(), 149_900);
        assert_eq!(Paise::from_rupees(0).as_i64(), 0);
    }

    #[test]
    fn test_times() {
        assert_eq!(Paise::new(149_900).times(3).as_i64(), 449_700);
        assert_eq!(Paise::new(100).times(0).as_i64(), 0);
    }

    #[test]
    fn test_sum() {
        let total: Paise = [Paise::new(100), Paise::new(250), Paise::new(50)]
            .into_iter()
            .sum();
        assert_eq!(total, Paise::new(400));
    }

    #[test]
    fn test_display() {
        assert_eq!(Paise::new(149_900).to_string(), "₹1499.00");
        assert_eq!(Paise::new(5).to_string(), "₹0.05");
        assert_eq!(Paise::new(0).to_string(), "₹0.00");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Paise::new(149_900)).unwrap();
        assert_eq!(json, "149900");

        let back: Paise = serde_json::from_str("149900").unwrap();
        assert_eq!(back, Paise::new(149_900));
    }
}
