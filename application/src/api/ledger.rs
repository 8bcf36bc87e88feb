//! Endpoints exposing the ledger reads as they are.

use axum::{Extension, Json};
use service::{
    query,
    read::{aging, lease, rent_roll},
    Query as _,
};

use crate::{Error, Service};

use super::storage_error;

/// Returns the rent roll of the current month.
///
/// # Errors
///
/// If the storage fails.
pub async fn rent_roll(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<rent_roll::Row>>, Error> {
    service
        .execute(query::rent_roll::AsOf::by(service.today()))
        .await
        .map(Json)
        .map_err(storage_error)
}

/// Returns the accounts receivable aging of every lease.
///
/// # Errors
///
/// If the storage fails.
pub async fn ar_aging(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<aging::Row>>, Error> {
    service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .map(Json)
        .map_err(storage_error)
}

/// Returns the lifetime totals of every lease.
///
/// # Errors
///
/// If the storage fails.
pub async fn lease_details(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<lease::Details>>, Error> {
    service
        .execute(query::leases::Details::by(()))
        .await
        .map(Json)
        .map_err(storage_error)
}
