//! # Money Module
//!
//! Provides the `Money` type for tuition, fees and discounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing session prices as floats across many athletes:                │
//! │    89.99 + 119.99 + 74.99 = 284.96999999999997  ❌ WRONG!              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    8999 + 11999 + 7499 = 28497 cents = $284.97                         │
//! │    Rounding only happens once, when a percentage is applied            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use academy_core::money::Money;
//!
//! let tuition = Money::from_cents(9000); // $90.00
//! let fees = Money::from_cents(3000).times(2); // $60.00
//! assert_eq!((tuition + fees).cents(), 15000);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money Flows
/// ```text
/// Session.price ──► PricingSnapshot.subtotal ──► sibling discount
///                                           │
///                   registration fees ──────┴──► total due ──► receipt
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use academy_core::money::Money;
    ///
    /// let price = Money::from_cents(9000);
    /// assert_eq!(price.cents(), 9000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal currency amount (e.g. `90.00`) to cents.
    ///
    /// Returns `None` for fractions of a cent or amounts outside the i64
    /// range.
    ///
    /// ## Example
    /// ```rust
    /// use academy_core::money::Money;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let price = Decimal::from_str("90.00").unwrap();
    /// assert_eq!(Money::from_decimal(price), Some(Money::from_cents(9000)));
    /// assert_eq!(Money::from_decimal(Decimal::from_str("0.005").unwrap()), None);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let cents = amount.checked_mul(Decimal::ONE_HUNDRED)?;
        if !cents.fract().is_zero() {
            return None;
        }
        cents.to_i64().map(Money)
    }

    /// Returns the amount as a decimal with two places.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a headcount (e.g. one registration fee per athlete).
    ///
    /// ## Example
    /// ```rust
    /// use academy_core::money::Money;
    ///
    /// let fee = Money::from_cents(3000);
    /// assert_eq!(fee.times(3).cents(), 9000);
    /// ```
    #[inline]
    pub const fn times(&self, count: i64) -> Self {
        Money(self.0 * count)
    }

    /// Returns `bps` basis points of this amount, rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math only: `(amount * bps + 5000) / 10000`.
    /// i128 keeps large subtotals from overflowing.
    ///
    /// ## Example
    /// ```rust
    /// use academy_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(21000); // $210.00
    /// assert_eq!(subtotal.percentage(1000).cents(), 2100); // 10% = $21.00
    ///
    /// // $0.05 at 10% = 0.5 cents, rounds up to 1 cent
    /// assert_eq!(Money::from_cents(5).percentage(1000).cents(), 1);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(part as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly `$12.34` rendering.
///
/// Presentation code that needs a configurable symbol goes through
/// `format_currency` in academy-enroll instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
