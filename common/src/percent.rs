//! [`Percent`]-related definitions.

use std::fmt;

use rust_decimal::Decimal;

/// Percentage rounded to a single fractional digit.
///
/// Not bounded by `100`: a ratio of anything to anything is a valid
/// [`Percent`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(transparent)
)]
pub struct Percent(
    #[cfg_attr(feature = "serde", serde(with = "rust_decimal::serde::float"))]
    Decimal,
);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Calculates the `part` of the `whole` in percents.
    ///
    /// Returns [`Percent::ZERO`] if the `whole` is zero.
    #[must_use]
    pub fn of(part: Decimal, whole: Decimal) -> Self {
        Self::new(Self::ratio(part, whole))
    }

    /// Calculates the `part` of the `whole` in percents, without rounding.
    ///
    /// Returns zero if the `whole` is zero.
    #[must_use]
    pub fn ratio(part: Decimal, whole: Decimal) -> Decimal {
        if whole.is_zero() {
            return Decimal::ZERO;
        }
        part / whole * Decimal::ONE_HUNDRED
    }

    /// Calculates the `part` of the `whole` count in percents.
    ///
    /// Returns [`Percent::ZERO`] if the `whole` is zero.
    #[must_use]
    pub fn of_count(part: usize, whole: usize) -> Self {
        Self::of(Decimal::from(part), Decimal::from(whole))
    }

    /// Creates a new [`Percent`] out of the provided `value` in percents.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let value = value.round_dp(1);
        if value.is_zero() {
            Self::ZERO
        } else {
            Self(value)
        }
    }
}

/// Formats with a single fractional digit, without a `%` sign.
impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
