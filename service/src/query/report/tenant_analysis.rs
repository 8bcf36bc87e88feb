//! [`TenantAnalysis`] definition.

use common::{Date, Money, Percent};
use itertools::Itertools as _;
use serde::Serialize;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Lease;
use crate::{
    infra::database,
    query::ledger::{self, Ledger},
    read::{
        aging::{self, Bucket},
        rent_roll,
    },
    Query, Service,
};

/// [`Query`] to analyze the tenants' payment behavior.
///
/// Both the rent roll and the aging are read from the same snapshot, as a
/// single [`Ledger`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TenantAnalysis {
    /// [`Date`] to analyze the tenants as of.
    pub as_of: Date,
}

/// Output of the [`TenantAnalysis`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Output {
    /// Tenants' counters.
    pub summary: Summary,

    /// Up to 3 [`rent_roll::Row`]s with the largest month balance.
    pub top_tenants: Vec<rent_roll::Row>,

    /// Overdue balances.
    pub aging_breakdown: AgingBreakdown,
}

/// Tenants' counters in the [`Output`] of the [`TenantAnalysis`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Summary {
    /// Number of [`Lease`]s active during the current month.
    pub total_tenants: usize,

    /// Number of active [`Lease`]s without overpayment in the current month.
    pub active_leases: usize,

    /// Number of [`Lease`]s with anything due.
    pub at_risk_count: usize,

    /// Share of the active [`Lease`]s paid on time.
    pub on_time_payment_rate: Percent,
}

/// Overdue balances in the [`Output`] of the [`TenantAnalysis`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct AgingBreakdown {
    /// Sum of all the due balances.
    pub total_overdue: Money,

    /// Sums of the due balances per [`Bucket`].
    pub by_bucket: ByBucket,
}

/// Sums of the due balances per [`Bucket`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ByBucket {
    /// Sum of the [`Bucket::UpTo30`] balances.
    #[serde(rename = "0_30")]
    pub up_to_30: Money,

    /// Sum of the [`Bucket::From31To60`] balances.
    #[serde(rename = "31_60")]
    pub from_31_to_60: Money,

    /// Sum of the [`Bucket::From61To90`] balances.
    #[serde(rename = "61_90")]
    pub from_61_to_90: Money,

    /// Sum of the [`Bucket::Over90`] balances.
    #[serde(rename = "90_plus")]
    pub over_90: Money,
}

impl Output {
    /// Analyzes the provided `rent_roll` and `aging` rows.
    #[must_use]
    pub fn new(rent_roll: &[rent_roll::Row], aging: &[aging::Row]) -> Self {
        let total_tenants = rent_roll.len();
        let on_time = rent_roll.iter().filter(|r| r.is_paid_on_time()).count();

        Self {
            summary: Summary {
                total_tenants,
                active_leases: rent_roll
                    .iter()
                    .filter(|r| !r.month_balance.is_negative())
                    .count(),
                at_risk_count: aging
                    .iter()
                    .filter(|r| r.total_due.is_positive())
                    .count(),
                on_time_payment_rate: Percent::of_count(on_time, total_tenants),
            },
            top_tenants: rent_roll
                .iter()
                .sorted_by(|a, b| b.month_balance.cmp(&a.month_balance))
                .take(3)
                .cloned()
                .collect(),
            aging_breakdown: AgingBreakdown {
                total_overdue: aging.iter().map(|r| r.total_due).sum(),
                by_bucket: ByBucket {
                    up_to_30: sum_bucket(aging, Bucket::UpTo30),
                    from_31_to_60: sum_bucket(aging, Bucket::From31To60),
                    from_61_to_90: sum_bucket(aging, Bucket::From61To90),
                    over_90: sum_bucket(aging, Bucket::Over90),
                },
            },
        }
    }
}

/// Sums the amounts of the provided `aging` rows in the [`Bucket`].
fn sum_bucket(aging: &[aging::Row], bucket: Bucket) -> Money {
    aging.iter().map(|r| r.amount_in(bucket)).sum()
}

impl<Db> Query<TenantAnalysis> for Service<Db>
where
    Self: Query<Ledger, Ok = ledger::Output, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        TenantAnalysis { as_of }: TenantAnalysis,
    ) -> Result<Self::Ok, Self::Err> {
        let ledger::Output { rent_roll, aging } = self
            .execute(Ledger { as_of })
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output::new(&rent_roll, &aging))
    }
}
