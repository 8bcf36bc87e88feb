//! [`Payment`] definitions.

use common::{Date, Money};
use serde::{Deserialize, Serialize};

use crate::domain::lease;
#[cfg(doc)]
use crate::domain::Lease;

/// Amount paid towards a [`Lease`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payment {
    /// ID of the [`Lease`] this [`Payment`] is made for.
    pub lease_id: lease::Id,

    /// Paid amount.
    pub amount: Money,

    /// [`Date`] this [`Payment`] was made at.
    pub paid_date: Date,
}
