//! [`Lease`] read definitions.

use common::Money;
use serde::Serialize;

use crate::domain::Lease;
#[cfg(doc)]
use crate::domain::{Charge, Payment};

/// [`Lease`] along with the totals of its whole history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Details {
    /// The [`Lease`] itself.
    #[serde(flatten)]
    pub lease: Lease,

    /// Number of [`Charge`]s billed to the [`Lease`].
    pub charge_count: i64,

    /// Number of [`Payment`]s made for the [`Lease`].
    pub payment_count: i64,

    /// Sum of all [`Charge`]s billed to the [`Lease`].
    pub total_charges: Money,

    /// Sum of all [`Payment`]s made for the [`Lease`].
    pub total_payments: Money,
}
