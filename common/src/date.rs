//! [`Date`]-related definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::Debug;
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{macros::format_description, Month};

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[debug("{_0}")]
pub struct Date(time::Date);

impl Date {
    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Returns the first day of the month this [`Date`] belongs to.
    #[must_use]
    pub fn month_start(self) -> Self {
        self.0.replace_day(1).map_or(self, Self)
    }

    /// Returns the last day of the month this [`Date`] belongs to.
    #[must_use]
    pub fn month_end(self) -> Self {
        let (year, month) = match self.0.month() {
            Month::December => (self.0.year() + 1, Month::January),
            month => (self.0.year(), month.next()),
        };
        time::Date::from_calendar_date(year, month, 1)
            .ok()
            .and_then(time::Date::previous_day)
            .map_or(self, Self)
    }

    /// Returns the [`Date`] the provided number of `days` before this one.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_sub_days(self, days: i64) -> Option<Self> {
        self.0.checked_sub(time::Duration::days(days)).map(Self)
    }

    /// Returns the [`Date`] the provided number of `days` after this one.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_add_days(self, days: i64) -> Option<Self> {
        self.0.checked_add(time::Duration::days(days)).map(Self)
    }
}

/// Formats as `YYYY-MM-DD`.
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .0
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(ParseError)
    }
}

/// Error of parsing a [`Date`] from a `YYYY-MM-DD` string.
#[derive(Clone, Copy, Debug, derive_more::Display, derive_more::Error)]
#[display("invalid date: {_0}")]
pub struct ParseError(time::error::Parse);

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Date;

    impl Serialize for Date {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(de::Error::custom)
        }
    }
}
