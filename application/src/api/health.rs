//! Health check endpoint.

use axum::{Extension, Json};
use serde::Serialize;
use service::infra::Dialect;

use crate::Service;

/// Response of the [`check()`] endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Health {
    /// Always `true` while the server is able to respond.
    pub ok: bool,

    /// [`Dialect`] of the configured storage.
    pub driver: Dialect,
}

/// Reports the server being alive along with its storage [`Dialect`].
///
/// Doesn't touch the storage.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn check(Extension(service): Extension<Service>) -> Json<Health> {
    Json(Health {
        ok: true,
        driver: service.database().dialect(),
    })
}
