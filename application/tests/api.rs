//! HTTP endpoints served over an in-memory SQLite storage.

use application::{
    api::{self, health::Health},
    Service,
};
use axum::{response::IntoResponse as _, Extension};
use service::infra::{sqlite, Dialect, Sqlite, Storage};
use sqlx::sqlite::SqlitePoolOptions;

/// Opens a new empty in-memory database.
async fn memory_pool() -> sqlite::Pool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

fn service(pool: &sqlite::Pool) -> Service {
    Service::new(
        service::Config {
            as_of: Some("2024-06-15".parse().unwrap()),
        },
        Storage::Sqlite(Sqlite::from_pool(pool.clone())),
    )
}

/// Seeds the ledger with:
/// - `101` charged and fully paid this month;
/// - `102` owing a charge due 45 days ago.
async fn seed(pool: &sqlite::Pool) {
    Sqlite::from_pool(pool.clone()).migrate().await.unwrap();

    for stmt in [
        "INSERT INTO leases \
         (id, tenant_name, unit_no, start_date, end_date, monthly_rent) \
         VALUES (1, 'Alice', '101', '2024-01-01', NULL, '1000')",
        "INSERT INTO leases \
         (id, tenant_name, unit_no, start_date, end_date, monthly_rent) \
         VALUES (2, 'Bob & Sons', '102', '2024-01-01', NULL, '800')",
        "INSERT INTO charges (lease_id, amount, due_date) \
         VALUES (1, '1000', '2024-06-01')",
        "INSERT INTO payments (lease_id, amount, paid_date) \
         VALUES (1, '1000', '2024-06-03')",
        "INSERT INTO charges (lease_id, amount, due_date) \
         VALUES (2, '800', '2024-05-01')",
    ] {
        _ = sqlx::query(stmt).execute(pool).await.unwrap();
    }
}

#[tokio::test]
async fn health() {
    let pool = memory_pool().await;

    let resp = api::health::check(Extension(service(&pool))).await;

    assert_eq!(
        resp.0,
        Health {
            ok: true,
            driver: Dialect::Sqlite,
        },
    );
}

#[tokio::test]
async fn rent_roll() {
    let pool = memory_pool().await;
    seed(&pool).await;

    let rows = api::ledger::rent_roll(Extension(service(&pool)))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&rows.0).unwrap(),
        serde_json::json!([
            {
                "lease_id": 1,
                "tenant_name": "Alice",
                "unit_no": "101",
                "monthly_charges": "1000.00",
                "monthly_payments": "1000.00",
                "month_balance": "0.00",
            },
            {
                "lease_id": 2,
                "tenant_name": "Bob & Sons",
                "unit_no": "102",
                "monthly_charges": "0.00",
                "monthly_payments": "0.00",
                "month_balance": "0.00",
            },
        ]),
    );
}

#[tokio::test]
async fn ar_aging() {
    let pool = memory_pool().await;
    seed(&pool).await;

    let rows = api::ledger::ar_aging(Extension(service(&pool)))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&rows.0).unwrap()[1],
        serde_json::json!({
            "lease_id": 2,
            "tenant_name": "Bob & Sons",
            "unit_no": "102",
            "bucket_0_30": "0.00",
            "bucket_31_60": "800.00",
            "bucket_61_90": "0.00",
            "bucket_90_plus": "0.00",
            "total_due": "800.00",
        }),
    );
}

#[tokio::test]
async fn reports() {
    let pool = memory_pool().await;
    seed(&pool).await;
    let service = service(&pool);

    let analysis = api::report::tenant_analysis(Extension(service.clone()))
        .await
        .unwrap();
    let json = serde_json::to_value(&analysis.0).unwrap();
    assert_eq!(json["summary"]["total_tenants"], 2);
    assert_eq!(json["summary"]["at_risk_count"], 1);
    assert_eq!(json["aging_breakdown"]["total_overdue"], "800.00");
    assert_eq!(json["aging_breakdown"]["by_bucket"]["31_60"], "800.00");

    let insights =
        api::report::financial_insights(Extension(service.clone()))
            .await
            .unwrap();
    let json = serde_json::to_value(&insights.0).unwrap();
    assert_eq!(json["revenue"]["total_charges"], "1000.00");
    assert_eq!(json["revenue"]["collection_rate"], 100.0);

    let metrics = api::report::property_metrics(Extension(service.clone()))
        .await
        .unwrap();
    let json = serde_json::to_value(&metrics.0).unwrap();
    assert_eq!(json["occupancy"]["total_units"], 2);
    assert_eq!(json["occupancy"]["occupancy_rate"], 100.0);

    let details = api::ledger::lease_details(Extension(service))
        .await
        .unwrap();
    let json = serde_json::to_value(&details.0).unwrap();
    assert_eq!(json[1]["charge_count"], 1);
    assert_eq!(json[1]["total_charges"], "800.00");
}

#[tokio::test]
async fn dashboard() {
    let pool = memory_pool().await;
    seed(&pool).await;

    let html = api::page::dashboard(Extension(service(&pool)))
        .await
        .unwrap()
        .0;

    assert!(html.contains("As of 2024-06-15"));
    assert!(html.contains("Bob &amp; Sons"));
    assert!(html.contains("<dt>Total aged balance</dt><dd>$800.00</dd>"));
    assert!(html.contains("<dt>Overdue leases</dt><dd>1</dd>"));
}

#[tokio::test]
async fn dashboard_releases_snapshot() {
    let pool = memory_pool().await;
    seed(&pool).await;
    let service = service(&pool);

    let first = api::page::dashboard(Extension(service.clone()))
        .await
        .unwrap()
        .0;
    let second = api::page::dashboard(Extension(service.clone()))
        .await
        .unwrap()
        .0;
    assert_eq!(first, second);

    // The only pooled connection is usable outside of a snapshot again.
    let rows = api::ledger::rent_roll(Extension(service)).await.unwrap();
    assert_eq!(rows.0.len(), 2);
}

#[tokio::test]
async fn responds_with_schema_error() {
    let pool = memory_pool().await;

    let err = api::ledger::rent_roll(Extension(service(&pool)))
        .await
        .unwrap_err();

    assert_eq!(err.code, "SCHEMA_ERROR");
    assert!(err.backtrace.is_some());
    assert_eq!(
        err.into_response().status(),
        http::StatusCode::INTERNAL_SERVER_ERROR,
    );
}
