//! HTTP API definitions.

pub mod health;
pub mod ledger;
pub mod page;
pub mod report;

use axum::{routing::get, Router};
use service::infra::database;
use tracerr::Traced;
use tracing as log;

use crate::{define_error, AsError as _, Error};

define_error! {
    enum StorageError {
        #[code = "STORAGE_UNAVAILABLE"]
        #[status = SERVICE_UNAVAILABLE]
        #[message = "Storage is unavailable"]
        Unavailable,

        #[code = "SCHEMA_ERROR"]
        #[status = INTERNAL_SERVER_ERROR]
        #[message = "Storage schema doesn't match the expected one"]
        Schema,
    }
}

/// Creates a new [`Router`] serving the whole HTTP API.
///
/// Expects the [`Service`] to be provided as an [`Extension`].
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
pub fn router() -> Router {
    Router::new()
        .route("/", get(page::dashboard))
        .route("/health", get(health::check))
        .route("/rent-roll", get(ledger::rent_roll))
        .route("/ar-aging", get(ledger::ar_aging))
        .route("/api/lease-details", get(ledger::lease_details))
        .route("/api/tenant-analysis", get(report::tenant_analysis))
        .route("/api/financial-insights", get(report::financial_insights))
        .route("/api/property-metrics", get(report::property_metrics))
}

/// Converts the provided [`database::Error`] into an API [`Error`], logging
/// its cause.
fn storage_error(err: Traced<database::Error>) -> Error {
    let error = err.as_error();
    log::error!("{error}\ncaused by: {}", err.as_ref());
    error
}
