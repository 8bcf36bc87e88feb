//! Accounts receivable aging read definitions.

use common::Money;
use serde::Serialize;
use strum::Display;

use crate::domain::lease::{self, TenantName, UnitNo};
#[cfg(doc)]
use crate::domain::{Charge, Lease};

/// Outstanding balance of a single [`Lease`], bucketed by its age.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Row {
    /// ID of the [`Lease`].
    pub lease_id: lease::Id,

    /// [`TenantName`] of the [`Lease`].
    pub tenant_name: TenantName,

    /// [`UnitNo`] of the [`Lease`].
    pub unit_no: UnitNo,

    /// Balance overdue for 30 days at most.
    pub bucket_0_30: Money,

    /// Balance overdue for 31 to 60 days.
    pub bucket_31_60: Money,

    /// Balance overdue for 61 to 90 days.
    pub bucket_61_90: Money,

    /// Balance overdue for more than 90 days.
    pub bucket_90_plus: Money,

    /// Whole positive balance of the [`Lease`], or zero.
    pub total_due: Money,
}

impl Row {
    /// Returns the [`Bucket`] the balance of this [`Row`] falls into.
    ///
    /// [`None`] is returned if nothing is due.
    #[must_use]
    pub fn bucket(&self) -> Option<Bucket> {
        Bucket::ALL
            .into_iter()
            .find(|b| self.amount_in(*b).is_positive())
    }

    /// Returns the amount of this [`Row`] in the provided [`Bucket`].
    #[must_use]
    pub fn amount_in(&self, bucket: Bucket) -> Money {
        match bucket {
            Bucket::UpTo30 => self.bucket_0_30,
            Bucket::From31To60 => self.bucket_31_60,
            Bucket::From61To90 => self.bucket_61_90,
            Bucket::Over90 => self.bucket_90_plus,
        }
    }
}

/// Range of days a balance is overdue for.
///
/// Measured since the latest [`Charge`] that is already due.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Bucket {
    /// 30 days at most.
    #[strum(to_string = "0_30")]
    UpTo30,

    /// 31 to 60 days.
    #[strum(to_string = "31_60")]
    From31To60,

    /// 61 to 90 days.
    #[strum(to_string = "61_90")]
    From61To90,

    /// More than 90 days.
    #[strum(to_string = "90_plus")]
    Over90,
}

impl Bucket {
    /// All the [`Bucket`]s in the ascending order.
    pub const ALL: [Self; 4] =
        [Self::UpTo30, Self::From31To60, Self::From61To90, Self::Over90];
}
