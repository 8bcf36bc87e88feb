//! [`Query`] collection related to the rent roll.

use common::{operations::By, Date};

use crate::read::rent_roll;
#[cfg(doc)]
use crate::{domain::Lease, Query};

use super::DatabaseQuery;

/// Queries the [`rent_roll::Row`]s of the [`Lease`]s active during the month
/// of the provided [`Date`].
pub type AsOf = DatabaseQuery<By<Vec<rent_roll::Row>, Date>>;
