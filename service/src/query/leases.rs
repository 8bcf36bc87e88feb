//! [`Query`] collection related to the multiple [`Lease`]s.

use common::operations::By;

use crate::read::lease;
#[cfg(doc)]
use crate::{domain::Lease, Query};

use super::DatabaseQuery;

/// Queries [`lease::Details`] of all the [`Lease`]s.
pub type Details = DatabaseQuery<By<Vec<lease::Details>, ()>>;
