//! Rent roll read definitions.

use common::Money;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::lease::{self, TenantName, UnitNo};
#[cfg(doc)]
use crate::domain::{Charge, Lease, Payment};

/// Share of the monthly charges to be paid for a month to be paid on time.
const ON_TIME_SHARE: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

/// Financials of a single [`Lease`] active during the current month.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Row {
    /// ID of the [`Lease`].
    pub lease_id: lease::Id,

    /// [`TenantName`] of the [`Lease`].
    pub tenant_name: TenantName,

    /// [`UnitNo`] of the [`Lease`].
    pub unit_no: UnitNo,

    /// Sum of [`Charge`]s due in the current month.
    pub monthly_charges: Money,

    /// Sum of [`Payment`]s made in the current month.
    pub monthly_payments: Money,

    /// [`Row::monthly_charges`] minus [`Row::monthly_payments`].
    pub month_balance: Money,
}

impl Row {
    /// Indicates whether the tenant paid at least 90% of the
    /// [`Row::monthly_charges`].
    ///
    /// A [`Row`] without charges is always paid on time.
    #[must_use]
    pub fn is_paid_on_time(&self) -> bool {
        self.monthly_payments >= self.monthly_charges * ON_TIME_SHARE
    }
}
