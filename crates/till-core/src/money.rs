//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A register summing 3.50 × 2 + 5.00 must print 12.00, every time.       │
//! │                                                                         │
//! │  OUR SOLUTION: Exact Decimals                                           │
//! │    prices, line totals and sums are exact base-10 values                │
//! │    8 × 0.125 is 1.000, not 8 × 0.13                                     │
//! │    rounding to the cent happens only when an amount is shown            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//! use till_core::Decimal;
//!
//! let price = Money::from_cents(350); // 3.50
//! let line_total = price.times(Decimal::from(2));
//! assert_eq!(line_total.cents(), 700);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

// =============================================================================
// Money Type
// =============================================================================

/// An exact amount of currency in major units.
///
/// ## Design Decisions
/// - **Decimal, not cents**: sub-cent unit prices stay exact
/// - **Signed**: the register accepts negative prices silently
/// - **Saturating**: products and sums that leave the Decimal range clamp
///   to `Decimal::MAX` / `Decimal::MIN` instead of panicking
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► × quantity ──► line_total()                   │
/// │                                              │                          │
/// │                    Transaction.total() ◄── Σ ┘                          │
/// │                             │                                           │
/// │                             └──► rounded to the cent ──► screen / docs  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact amount in major units.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// The exact amount in major units.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded half away from zero to the cent.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Returns the rounded value in cents, saturating at the i64 range.
    ///
    /// ## Example
    /// ```rust
    /// use std::str::FromStr;
    /// use till_core::money::Money;
    /// use till_core::Decimal;
    ///
    /// let price = Money::new(Decimal::from_str("3.505").unwrap());
    /// assert_eq!(price.cents(), 351);
    /// ```
    pub fn cents(&self) -> i64 {
        self.rounded()
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .unwrap_or(if self.is_negative() { i64::MIN } else { i64::MAX })
    }

    /// Returns the amount in major units as a float.
    ///
    /// Only for handing numbers to spreadsheet cells; never compute with it.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Renders the amount with a currency symbol: `$12.34`, `-$5.50`.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1234).format_with_symbol("$"), "$12.34");
    /// assert_eq!(Money::from_cents(-550).format_with_symbol("€"), "-€5.50");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let (sign, digits) = self.display_parts();
        format!("{}{}{}", sign, symbol, digits)
    }

    /// Sign and unsigned two-decimal digits of the rounded amount.
    fn display_parts(&self) -> (&'static str, String) {
        let mut rounded = self.rounded();
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        rounded.set_sign_positive(true);
        rounded.rescale(2);
        (sign, rounded.to_string())
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// The product is exact. Products outside the Decimal range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use std::str::FromStr;
    /// use till_core::money::Money;
    /// use till_core::Decimal;
    ///
    /// let per_screw = Money::new(Decimal::from_str("0.125").unwrap());
    /// let box_of_eight = per_screw.times(Decimal::from(8));
    /// assert_eq!(box_of_eight.cents(), 100);
    /// ```
    pub fn times(&self, quantity: Decimal) -> Money {
        match self.0.checked_mul(quantity) {
            Some(product) => Money(product),
            None => saturated(self.is_negative() != (quantity < Decimal::ZERO)),
        }
    }
}

fn saturated(negative: bool) -> Money {
    if negative {
        Money(Decimal::MIN)
    } else {
        Money(Decimal::MAX)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to the cent, without a currency symbol:
/// `12.00`, `-5.50`.
///
/// ## Note
/// The symbol is configuration; the app prefixes it via `format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, digits) = self.display_parts();
        write!(f, "{}{}", sign, digits)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturating addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        match self.0.checked_add(other.0) {
            Some(sum) => Money(sum),
            None => saturated(other.is_negative()),
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.amount(), dec("10.99"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::new(dec("7")).to_string(), "7.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec("0.125")).to_string(), "0.13");
        assert_eq!(Money::new(dec("-0.125")).to_string(), "-0.13");
        assert_eq!(Money::new(dec("0.004")).to_string(), "0.00");
        assert_eq!(Money::new(dec("-0.004")).to_string(), "0.00");
    }

    #[test]
    fn test_amount_stays_exact() {
        let price = Money::new(dec("0.125"));
        assert_eq!(price.amount(), dec("0.125"));
        assert_eq!(price.cents(), 13);
        assert_eq!(price.times(dec("8")).amount(), dec("1"));
    }

    #[test]
    fn test_times_whole_and_fractional() {
        assert_eq!(Money::from_cents(350).times(dec("2")).cents(), 700);
        assert_eq!(Money::from_cents(199).times(dec("1.5")).amount(), dec("2.985"));
        assert_eq!(Money::from_cents(100).times(dec("0")).cents(), 0);
        assert_eq!(Money::from_cents(100).times(dec("-2")).cents(), -200);
    }

    #[test]
    fn test_times_saturates() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.times(dec("10")), Money::new(Decimal::MAX));
        assert_eq!(huge.times(dec("-10")), Money::new(Decimal::MIN));
        assert_eq!(huge.cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_sum_saturates_instead_of_overflowing() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max + max, max);
        assert_eq!(max + Money::from_cents(1), max);

        let min = Money::new(Decimal::MIN);
        assert_eq!(min + min, min);

        let total: Money = [max, max, Money::from_cents(-100)].into_iter().sum();
        assert!(total.amount() > dec("1e28"));
    }

    #[test]
    fn test_to_f64() {
        assert!((Money::from_cents(350).to_f64() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(-100).is_negative());
    }
}
