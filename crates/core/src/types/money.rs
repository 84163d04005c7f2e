//! Premium amounts using decimal arithmetic.
//!
//! Premiums are dollar amounts with cent precision. They travel as plain
//! JSON numbers on the wire (the microservices speak `monthlyPremium: 450.0`)
//! but are held as `Decimal` internally so totals never accumulate binary
//! floating point error.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Months in a coverage year, used for annualizing a monthly premium.
const MONTHS_PER_YEAR: u32 = 12;

/// A monthly premium amount in the plan's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Premium(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Premium {
    /// Create a premium from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The zero premium.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The annual cost of this premium (monthly amount times twelve).
    #[must_use]
    pub fn annualized(&self) -> Self {
        Self(self.0 * Decimal::from(MONTHS_PER_YEAR))
    }

    /// Whether the premium is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Premium {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Premium {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Premium {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Premium {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for Premium {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Premium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

/// ISO 4217 currency codes accepted by the payments service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_annualized_is_twelve_months() {
        let monthly = Premium::new(Decimal::from(200));
        assert_eq!(monthly.annualized(), Premium::new(Decimal::from(2400)));
    }

    #[test]
    fn test_sum_over_iterator() {
        let premiums = vec![
            Premium::new(Decimal::from(200)),
            Premium::new(Decimal::from(150)),
        ];
        let total: Premium = premiums.iter().sum();
        assert_eq!(total, Premium::new(Decimal::from(350)));
    }

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(Premium::new(Decimal::new(1999, 1)).to_string(), "$199.90");
        assert_eq!(Premium::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_serde_as_number() {
        let premium = Premium::new(Decimal::new(4505, 1));
        let json = serde_json::to_string(&premium).unwrap();
        assert_eq!(json, "450.5");

        let back: Premium = serde_json::from_str("450.5").unwrap();
        assert_eq!(back, premium);
    }
}
