//! Reports aggregating the read entities in memory.

pub mod financial_insights;
pub mod property_metrics;
pub mod tenant_analysis;

pub use self::{
    financial_insights::FinancialInsights, property_metrics::PropertyMetrics,
    tenant_analysis::TenantAnalysis,
};
