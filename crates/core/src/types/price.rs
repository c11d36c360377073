//! Type-safe price representation using decimal arithmetic.
//!
//! Menu prices arrive from the server as JSON numbers with at most two
//! decimal places. They are held as [`Decimal`] so line totals and tax never
//! pick up binary floating point drift.
//!
//! Arithmetic saturates at the limits of [`Decimal`] instead of panicking.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Line total for `quantity` units at this price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(
            self.amount.saturating_mul(Decimal::from(quantity)),
            self.currency_code,
        )
    }

    /// Like [`times`](Self::times), but `None` if the result does not fit.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency_code))
    }

    /// `percent`% of this price, rounded to the minor unit.
    #[must_use]
    pub fn percent_of(self, percent: Decimal) -> Self {
        let scaled = self.amount.saturating_mul(percent);
        let amount = scaled.checked_div(Decimal::ONE_HUNDRED).unwrap_or(scaled);
        Self::new(amount, self.currency_code).rounded()
    }

    /// Round half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            self.currency_code,
        )
    }

    /// Format for display (e.g., "₹200.00").
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{}{amount:.2}", self.currency_code.symbol())
    }
}

impl Add for Price {
    type Output = Self;

    /// Adds amounts; the left operand's currency wins.
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.amount.saturating_add(rhs.amount), self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(CurrencyCode::default()), Add::add)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn inr(s: &str) -> Price {
        Price::from_amount(s.parse().unwrap())
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(inr("200").to_string(), "₹200.00");
        assert_eq!(inr("49.5").to_string(), "₹49.50");
        assert_eq!(Price::zero(CurrencyCode::INR).to_string(), "₹0.00");
    }

    #[test]
    fn test_times() {
        assert_eq!(inr("100").times(2), inr("200"));
        assert_eq!(inr("12.25").times(0), inr("0"));
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        // 5% of 250.10 = 12.505
        assert_eq!(inr("250.10").percent_of(Decimal::from(5)), inr("12.51"));
        assert_eq!(inr("250").percent_of(Decimal::from(5)), inr("12.50"));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::from_amount(Decimal::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(max.checked_times(2), None);
        assert_eq!(max + inr("1"), max);
        assert_eq!(max.percent_of(Decimal::from(500)).amount, Decimal::MAX / Decimal::ONE_HUNDRED);
        assert_eq!(inr("100").checked_times(3), Some(inr("300")));
    }

    #[test]
    fn test_sum() {
        let total: Price = [inr("200"), inr("50")].into_iter().sum();
        assert_eq!(total, inr("250"));

        let empty: Price = core::iter::empty().sum();
        assert_eq!(empty, Price::zero(CurrencyCode::INR));
    }
}
