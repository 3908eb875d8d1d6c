//! Price type for book prices.
//!
//! Prices are whole rupees stored as integers, matching what the backend
//! tables hold. No minor-unit handling is modelled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Currency symbol used when rendering prices.
pub const CURRENCY_SYMBOL: &str = "\u{20b9}";

/// A price in whole rupees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero rupees.
    pub const ZERO: Price = Price(0);

    /// Create a price from a whole-rupee amount.
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// The raw amount.
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, quantity: u32) -> Option<Price> {
        self.0.checked_mul(i64::from(quantity)).map(Price)
    }

    /// Add another price, returning `None` on overflow.
    pub fn checked_add(&self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Price)
    }

    /// Multiply by a quantity, saturating at the numeric bounds.
    pub fn saturating_mul(&self, quantity: u32) -> Price {
        Price(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Amount saved going from `old` to `self`; negative when the price went up.
    pub fn reduction_from(&self, old: Price) -> i64 {
        old.0.saturating_sub(self.0)
    }

    /// Percentage saved relative to `old`, rounded half away from zero.
    ///
    /// Returns 0 when `old` is not positive.
    pub fn discount_percent(&self, old: Price) -> i64 {
        if old.0 <= 0 {
            return 0;
        }
        let pct = self.reduction_from(old) as f64 / old.0 as f64 * 100.0;
        pct.round() as i64
    }

    /// Format as a display string (e.g., "₹399").
    pub fn display(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.0)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Price(amount)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, other: Price) -> Price {
        Price(self.0.saturating_add(other.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, |acc, p| acc + p)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(399).display(), "\u{20b9}399");
        assert_eq!(format!("{}", Price::new(0)), "\u{20b9}0");
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(Price::new(499).checked_mul(2), Some(Price::new(998)));
        assert_eq!(Price::new(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn test_discount_percent() {
        // 399 vs 599 -> 33.39% -> 33
        assert_eq!(Price::new(399).discount_percent(Price::new(599)), 33);
        // 299 vs 599 -> 50.08% -> 50
        assert_eq!(Price::new(299).discount_percent(Price::new(599)), 50);
        assert_eq!(Price::new(100).discount_percent(Price::new(100)), 0);
        assert_eq!(Price::new(100).discount_percent(Price::ZERO), 0);
    }

    #[test]
    fn test_discount_percent_extremes() {
        assert_eq!(Price::new(i64::MIN).discount_percent(Price::new(i64::MAX)), 100);
        assert!(Price::new(i64::MAX).discount_percent(Price::new(1)) < 0);
    }

    #[test]
    fn test_reduction_from() {
        assert_eq!(Price::new(349).reduction_from(Price::new(699)), 350);
        assert_eq!(Price::new(700).reduction_from(Price::new(699)), -1);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::new(399), Price::new(998)].into_iter().sum();
        assert_eq!(total, Price::new(1397));
    }
}
