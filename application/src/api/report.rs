//! Endpoints of the analytic reports.

use axum::{Extension, Json};
use service::{
    query::report::{
        financial_insights, property_metrics, tenant_analysis,
        FinancialInsights, PropertyMetrics, TenantAnalysis,
    },
    Query as _,
};

use crate::{Error, Service};

use super::storage_error;

/// Analyzes the tenants' payment behavior.
///
/// # Errors
///
/// If the storage fails.
pub async fn tenant_analysis(
    Extension(service): Extension<Service>,
) -> Result<Json<tenant_analysis::Output>, Error> {
    service
        .execute(TenantAnalysis {
            as_of: service.today(),
        })
        .await
        .map(Json)
        .map_err(storage_error)
}

/// Summarizes the revenue of the current month.
///
/// # Errors
///
/// If the storage fails.
pub async fn financial_insights(
    Extension(service): Extension<Service>,
) -> Result<Json<financial_insights::Output>, Error> {
    service
        .execute(FinancialInsights {
            as_of: service.today(),
        })
        .await
        .map(Json)
        .map_err(storage_error)
}

/// Measures the occupancy and revenue of the units.
///
/// # Errors
///
/// If the storage fails.
pub async fn property_metrics(
    Extension(service): Extension<Service>,
) -> Result<Json<property_metrics::Output>, Error> {
    service
        .execute(PropertyMetrics {
            as_of: service.today(),
        })
        .await
        .map(Json)
        .map_err(storage_error)
}
