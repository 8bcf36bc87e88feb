//! [`Money`]-related definitions.

use std::{fmt, iter::Sum, ops, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};

/// Amount of money with a cent precision.
///
/// Any [`Decimal`] may be carried through arithmetic, but the amount is always
/// rendered with exactly 2 fractional digits.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Money(Decimal);

impl Money {
    /// Zero [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Returns the [`Decimal`] amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Indicates whether this [`Money`] is strictly less than zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds this [`Money`] to cents, with midpoints away from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        let amount = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if amount.is_zero() {
            Self::ZERO
        } else {
            Self(amount)
        }
    }

    /// Divides this [`Money`] evenly by the provided `count`.
    ///
    /// Returns [`Money::ZERO`] if the `count` is zero.
    #[must_use]
    pub fn per(self, count: usize) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        Self(self.0 / Decimal::from(count))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

/// Parses an amount in a `[$]<decimal>` format.
///
/// An empty input is parsed as [`Money::ZERO`].
impl FromStr for Money {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s).trim_start();
        if s.is_empty() {
            return Ok(Self::ZERO);
        }
        Decimal::from_str(s).map(Self).map_err(ParseError)
    }
}

/// Error of parsing [`Money`] from a string.
#[derive(Clone, Debug, derive_more::Display, derive_more::Error)]
#[display("invalid money amount: {_0}")]
pub struct ParseError(rust_decimal::Error);

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl ops::Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! [`Money`] is represented as a string with exactly 2 fractional digits
    //! (`"1250.00"`), so its textual form never depends on a floating-point
    //! formatter.

    use std::str::FromStr as _;

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Money;

    impl Serialize for Money {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Money {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(de::Error::custom)
        }
    }
}
