//! [`Lease`] definitions.

use common::{Date, Money};
use derive_more::{AsRef, Display, From, Into};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// Lease of a unit by a tenant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Lease {
    /// ID of this [`Lease`].
    pub id: Id,

    /// [`TenantName`] of the tenant renting the unit.
    pub tenant_name: TenantName,

    /// [`UnitNo`] of the leased unit.
    pub unit_no: UnitNo,

    /// [`Date`] this [`Lease`] starts at.
    pub start_date: Date,

    /// [`Date`] this [`Lease`] ends at, if it's not open-ended.
    ///
    /// Never before the [`Lease::start_date`].
    pub end_date: Option<Date>,

    /// Rent agreed to be paid monthly.
    pub monthly_rent: Money,
}

/// ID of a [`Lease`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromSql,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    ToSql,
)]
#[postgres(transparent)]
pub struct Id(i64);

/// Name of a tenant renting a unit.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromSql,
    Hash,
    Into,
    PartialEq,
    Serialize,
    ToSql,
)]
#[as_ref(str)]
#[postgres(transparent)]
pub struct TenantName(String);

/// Number of a leased unit.
///
/// Not necessarily numeric: compared lexically (byte-wise).
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromSql,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    ToSql,
)]
#[as_ref(str)]
#[postgres(transparent)]
pub struct UnitNo(String);

impl From<&str> for TenantName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<&str> for UnitNo {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
