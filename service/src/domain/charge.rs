//! [`Charge`] definitions.

use common::{Date, Money};
use serde::{Deserialize, Serialize};

use crate::domain::lease;
#[cfg(doc)]
use crate::domain::Lease;

/// Amount billed to a [`Lease`] and due at some [`Date`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Charge {
    /// ID of the [`Lease`] this [`Charge`] is billed to.
    pub lease_id: lease::Id,

    /// Billed amount.
    pub amount: Money,

    /// [`Date`] this [`Charge`] is due at.
    pub due_date: Date,
}
