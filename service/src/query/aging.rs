//! [`Query`] collection related to the accounts receivable aging.

use common::{operations::By, Date};

use crate::read::aging;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the [`aging::Row`]s of all the leases as of the provided [`Date`].
pub type AsOf = DatabaseQuery<By<Vec<aging::Row>, Date>>;
