//! Reports computed by the SQLite backend against an in-memory database.

use common::{Date, Money};
use service::{
    domain::{lease, Charge, Payment},
    infra::{database::ErrorKind, sqlite, Dialect, Sqlite, Storage},
    query::{self, ledger::Ledger, report},
    read::aging,
    Config, Query as _, Service,
};
use sqlx::sqlite::SqlitePoolOptions;

fn date(s: &str) -> Date {
    s.parse().unwrap()
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

/// [`Date`] every report is evaluated as of.
fn as_of() -> Date {
    date("2024-06-15")
}

/// Formats the [`Date`] the provided number of `days` before [`as_of()`].
fn days_ago(days: i64) -> String {
    as_of().checked_sub_days(days).unwrap().to_string()
}

/// Formats the [`Date`] the provided number of `days` after [`as_of()`].
fn days_ahead(days: i64) -> String {
    as_of().checked_add_days(days).unwrap().to_string()
}

/// Opens a new empty in-memory database.
///
/// A single connection is kept forever, as every new connection to
/// `sqlite::memory:` opens a distinct database.
async fn memory_pool() -> sqlite::Pool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

async fn insert_lease(
    pool: &sqlite::Pool,
    id: i64,
    tenant: &str,
    unit: &str,
    (start, end): (&str, Option<&str>),
    rent: &str,
) {
    _ = sqlx::query(
        "INSERT INTO leases \
         (id, tenant_name, unit_no, start_date, end_date, monthly_rent) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(tenant)
    .bind(unit)
    .bind(start)
    .bind(end)
    .bind(rent)
    .execute(pool)
    .await
    .unwrap();
}

async fn insert_charge(pool: &sqlite::Pool, charge: Charge) {
    _ = sqlx::query(
        "INSERT INTO charges (lease_id, amount, due_date) VALUES (?1, ?2, ?3)",
    )
    .bind(i64::from(charge.lease_id))
    .bind(charge.amount.to_string())
    .bind(charge.due_date.to_string())
    .execute(pool)
    .await
    .unwrap();
}

async fn insert_payment(pool: &sqlite::Pool, payment: Payment) {
    _ = sqlx::query(
        "INSERT INTO payments (lease_id, amount, paid_date) \
         VALUES (?1, ?2, ?3)",
    )
    .bind(i64::from(payment.lease_id))
    .bind(payment.amount.to_string())
    .bind(payment.paid_date.to_string())
    .execute(pool)
    .await
    .unwrap();
}

async fn charge(pool: &sqlite::Pool, lease_id: i64, amount: &str, due: &str) {
    insert_charge(
        pool,
        Charge {
            lease_id: lease::Id::from(lease_id),
            amount: money(amount),
            due_date: date(due),
        },
    )
    .await;
}

async fn payment(
    pool: &sqlite::Pool,
    lease_id: i64,
    amount: &str,
    paid: &str,
) {
    insert_payment(
        pool,
        Payment {
            lease_id: lease::Id::from(lease_id),
            amount: money(amount),
            paid_date: date(paid),
        },
    )
    .await;
}

/// Collects the aging amounts of the provided `rows` in the
/// `[unit_no, 0_30, 31_60, 61_90, 90_plus, total_due]` order.
fn aging_table(rows: &[aging::Row]) -> Vec<[String; 6]> {
    rows.iter()
        .map(|r| {
            [
                r.unit_no.to_string(),
                r.bucket_0_30.to_string(),
                r.bucket_31_60.to_string(),
                r.bucket_61_90.to_string(),
                r.bucket_90_plus.to_string(),
                r.total_due.to_string(),
            ]
        })
        .collect()
}

/// Creates a [`Service`] over a migrated in-memory database evaluating
/// reports as of `2024-06-15`.
async fn service(pool: &sqlite::Pool) -> Service<Storage> {
    let sqlite = Sqlite::from_pool(pool.clone());
    sqlite.migrate().await.unwrap();
    Service::new(
        Config {
            as_of: Some(as_of()),
        },
        Storage::Sqlite(sqlite),
    )
}

/// Seeds the ledger with the following leases:
/// - `100` has 3 charges in June, 2 of them already due, partially paid;
/// - `101` is fully paid this month;
/// - `102` owes a charge due 45 days ago;
/// - `103` has no charges and no payments;
/// - `104` ended in March and owes a charge of January.
async fn seed(pool: &sqlite::Pool) {
    insert_lease(pool, 1, "Alice", "101", ("2024-01-01", None), "1000").await;
    insert_lease(pool, 2, "Bob", "102", ("2024-01-01", None), "800").await;
    insert_lease(pool, 3, "Carol", "103", ("2024-06-01", None), "900").await;
    insert_lease(
        pool,
        4,
        "Dave",
        "104",
        ("2023-01-01", Some("2024-03-31")),
        "500",
    )
    .await;
    insert_lease(pool, 5, "Eve", "100", ("2024-02-01", None), "1100.00").await;

    charge(pool, 5, "600", "2024-06-01").await;
    charge(pool, 5, "400", "2024-06-10").await;
    charge(pool, 5, "100", &days_ahead(10)).await;
    payment(pool, 5, "300", "2024-06-05").await;
    payment(pool, 5, "200", "2024-06-12").await;

    charge(pool, 1, "1000", "2024-06-01").await;
    payment(pool, 1, "1000", "2024-06-03").await;

    charge(pool, 2, "800", &days_ago(45)).await;

    charge(pool, 4, "500", "2024-01-01").await;
}

#[tokio::test]
async fn rent_roll() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    seed(&pool).await;

    let rows = service
        .execute(query::rent_roll::AsOf::by(service.today()))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&rows).unwrap(),
        serde_json::json!([
            {
                "lease_id": 5,
                "tenant_name": "Eve",
                "unit_no": "100",
                "monthly_charges": "1100.00",
                "monthly_payments": "500.00",
                "month_balance": "600.00",
            },
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
                "tenant_name": "Bob",
                "unit_no": "102",
                "monthly_charges": "0.00",
                "monthly_payments": "0.00",
                "month_balance": "0.00",
            },
            {
                "lease_id": 3,
                "tenant_name": "Carol",
                "unit_no": "103",
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
    let service = service(&pool).await;
    seed(&pool).await;

    let rows = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();

    let zero = "0.00";
    assert_eq!(
        aging_table(&rows),
        [
            ["100", "500.00", zero, zero, zero, "500.00"],
            ["101", zero, zero, zero, zero, zero],
            ["102", zero, "800.00", zero, zero, "800.00"],
            ["103", zero, zero, zero, zero, zero],
            ["104", zero, zero, zero, "500.00", "500.00"],
        ],
    );

    for row in &rows {
        match row.bucket() {
            Some(bucket) => assert_eq!(row.amount_in(bucket), row.total_due),
            None => assert_eq!(row.total_due, Money::ZERO),
        }
    }
}

#[tokio::test]
async fn tenant_analysis() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    seed(&pool).await;

    let output = service
        .execute(report::TenantAnalysis {
            as_of: service.today(),
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(
        json["summary"],
        serde_json::json!({
            "total_tenants": 4,
            "active_leases": 4,
            "at_risk_count": 3,
            "on_time_payment_rate": 75.0,
        }),
    );
    assert_eq!(
        output
            .top_tenants
            .iter()
            .map(|r| r.tenant_name.as_ref())
            .collect::<Vec<&str>>(),
        ["Eve", "Alice", "Bob"],
    );
    assert_eq!(
        json["aging_breakdown"],
        serde_json::json!({
            "total_overdue": "1800.00",
            "by_bucket": {
                "0_30": "500.00",
                "31_60": "800.00",
                "61_90": "0.00",
                "90_plus": "500.00",
            },
        }),
    );

    // Snapshot is committed, so the only connection is usable again.
    let again = service
        .execute(report::TenantAnalysis {
            as_of: service.today(),
        })
        .await
        .unwrap();
    assert_eq!(again, output);
}

#[tokio::test]
async fn financial_insights() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    seed(&pool).await;

    let output = service
        .execute(report::FinancialInsights {
            as_of: service.today(),
        })
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&output.revenue).unwrap(),
        serde_json::json!({
            "total_charges": "2100.00",
            "total_payments": "1500.00",
            "outstanding": "600.00",
            "collection_rate": 71.4,
            "avg_lease_value": "525.00",
        }),
    );
    assert_eq!(output.projections.next_month_projected, money("2142"));
}

#[tokio::test]
async fn property_metrics() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    seed(&pool).await;

    let output = service
        .execute(report::PropertyMetrics {
            as_of: service.today(),
        })
        .await
        .unwrap();

    assert_eq!(output.occupancy.total_units, 4);
    assert_eq!(output.occupancy.occupied, 4);
    assert_eq!(output.occupancy.vacant, 0);
    assert_eq!(output.occupancy.occupancy_rate.to_string(), "100.0");
    assert_eq!(output.revenue.per_unit, money("525"));
    assert_eq!(output.revenue.annualized, money("25200"));
    assert_eq!(
        output
            .top_units
            .iter()
            .map(|u| u.unit.as_ref())
            .collect::<Vec<&str>>(),
        ["101", "100", "102"],
    );
}

#[tokio::test]
async fn lease_details() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    seed(&pool).await;

    let details = service
        .execute(query::leases::Details::by(()))
        .await
        .unwrap();

    assert_eq!(details.len(), 5);
    assert_eq!(
        serde_json::to_value(&details[0]).unwrap(),
        serde_json::json!({
            "id": 5,
            "tenant_name": "Eve",
            "unit_no": "100",
            "start_date": "2024-02-01",
            "end_date": null,
            "monthly_rent": "1100.00",
            "charge_count": 3,
            "payment_count": 2,
            "total_charges": "1100.00",
            "total_payments": "500.00",
        }),
    );

    let ended = &details[4];
    assert_eq!(ended.lease.unit_no.as_ref(), "104");
    assert_eq!(ended.lease.end_date, Some(date("2024-03-31")));
    assert_eq!(ended.charge_count, 1);
    assert_eq!(ended.payment_count, 0);
    assert_eq!(ended.total_payments, Money::ZERO);

    let empty = &details[3];
    assert_eq!(empty.lease.unit_no.as_ref(), "103");
    assert_eq!(empty.charge_count, 0);
    assert_eq!(empty.total_charges, Money::ZERO);
}

#[tokio::test]
async fn reports_no_leases() {
    let pool = memory_pool().await;
    let service = service(&pool).await;

    let rent_roll = service
        .execute(query::rent_roll::AsOf::by(service.today()))
        .await
        .unwrap();
    assert!(rent_roll.is_empty());

    let analysis = service
        .execute(report::TenantAnalysis {
            as_of: service.today(),
        })
        .await
        .unwrap();
    assert_eq!(analysis.summary.total_tenants, 0);
    assert_eq!(analysis.summary.on_time_payment_rate.to_string(), "0.0");

    let metrics = service
        .execute(report::PropertyMetrics {
            as_of: service.today(),
        })
        .await
        .unwrap();
    assert_eq!(metrics.occupancy.occupancy_rate.to_string(), "0.0");
}

#[tokio::test]
async fn reports_are_idempotent() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    seed(&pool).await;

    let first = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();
    let second = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn fails_on_missing_schema() {
    let pool = memory_pool().await;
    let service: Service<Storage> = Service::new(
        Config::default(),
        Storage::Sqlite(Sqlite::from_pool(pool)),
    );
    assert_eq!(service.database().dialect(), Dialect::Sqlite);

    let err = service
        .execute(query::rent_roll::AsOf::by(date("2024-06-15")))
        .await
        .unwrap_err();

    assert_eq!(err.as_ref().kind(), ErrorKind::Schema);
}

#[tokio::test]
async fn ages_balances_at_bucket_boundaries() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    let dues = [
        days_ago(0),
        days_ago(30),
        days_ago(31),
        days_ago(60),
        days_ago(61),
        days_ago(90),
        days_ago(91),
        days_ahead(1),
    ];
    for (id, due) in (1..).zip(&dues) {
        let unit = format!("{}", 100 + id);
        insert_lease(&pool, id, "Tenant", &unit, ("2023-01-01", None), "100")
            .await;
        charge(&pool, id, "100", due).await;
    }

    let rows = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();

    let (zero, due) = ("0.00", "100.00");
    assert_eq!(
        aging_table(&rows),
        [
            ["101", due, zero, zero, zero, due],
            ["102", due, zero, zero, zero, due],
            ["103", zero, due, zero, zero, due],
            ["104", zero, due, zero, zero, due],
            ["105", zero, zero, due, zero, due],
            ["106", zero, zero, due, zero, due],
            ["107", zero, zero, zero, due, due],
            ["108", zero, zero, zero, zero, zero],
        ],
    );
}

#[tokio::test]
async fn ages_overpaid_balance_as_nothing_due() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    insert_lease(&pool, 1, "Alice", "101", ("2024-01-01", None), "500").await;
    charge(&pool, 1, "500", &days_ago(40)).await;
    payment(&pool, 1, "700", &days_ago(10)).await;

    let rows = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();
    let zero = "0.00";
    assert_eq!(
        aging_table(&rows),
        [["101", zero, zero, zero, zero, zero]],
    );

    let analysis = service
        .execute(report::TenantAnalysis {
            as_of: service.today(),
        })
        .await
        .unwrap();
    assert_eq!(analysis.summary.at_risk_count, 0);
    assert_eq!(analysis.aging_breakdown.total_overdue, Money::ZERO);
}

#[tokio::test]
async fn reports_payments_without_charges() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    insert_lease(&pool, 1, "Alice", "101", ("2024-01-01", None), "500").await;
    payment(&pool, 1, "300", &days_ago(10)).await;

    let rent_roll = service
        .execute(query::rent_roll::AsOf::by(service.today()))
        .await
        .unwrap();
    assert_eq!(rent_roll.len(), 1);
    assert_eq!(rent_roll[0].monthly_charges, Money::ZERO);
    assert_eq!(rent_roll[0].monthly_payments, money("300"));
    assert_eq!(rent_roll[0].month_balance.to_string(), "-300.00");

    let aging = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();
    let zero = "0.00";
    assert_eq!(
        aging_table(&aging),
        [["101", zero, zero, zero, zero, zero]],
    );

    let analysis = service
        .execute(report::TenantAnalysis {
            as_of: service.today(),
        })
        .await
        .unwrap();
    assert_eq!(analysis.summary.total_tenants, 1);
    assert_eq!(analysis.summary.active_leases, 0);
    assert_eq!(analysis.summary.at_risk_count, 0);
    assert_eq!(analysis.summary.on_time_payment_rate.to_string(), "100.0");
}

#[tokio::test]
async fn rent_roll_covers_whole_month() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    let leases = [
        ("101", ("2024-06-30", None)),
        ("102", ("2024-01-01", Some("2024-06-01"))),
        ("103", ("2024-07-01", None)),
        ("104", ("2024-01-01", Some("2024-05-31"))),
    ];
    for (id, (unit, term)) in (1..).zip(leases) {
        insert_lease(&pool, id, "Tenant", unit, term, "100").await;
    }
    charge(&pool, 1, "100", "2024-06-30").await;
    charge(&pool, 1, "100", "2024-07-01").await;
    payment(&pool, 2, "50", "2024-06-01").await;
    payment(&pool, 2, "50", "2024-05-31").await;

    let rows = service
        .execute(query::rent_roll::AsOf::by(service.today()))
        .await
        .unwrap();

    assert_eq!(
        rows.iter()
            .map(|r| {
                (
                    r.unit_no.as_ref(),
                    r.monthly_charges.to_string(),
                    r.monthly_payments.to_string(),
                )
            })
            .collect::<Vec<_>>(),
        [
            ("101", "100.00".to_owned(), "0.00".to_owned()),
            ("102", "0.00".to_owned(), "50.00".to_owned()),
        ],
    );
}

#[tokio::test]
async fn compares_dates_with_time_part() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    for stmt in [
        "INSERT INTO leases \
         (id, tenant_name, unit_no, start_date, end_date, monthly_rent) \
         VALUES (1, 'Alice', '101', '2024-06-30 12:00:00', NULL, '100')",
        "INSERT INTO charges (lease_id, amount, due_date) \
         VALUES (1, '100', '2024-06-15 09:00:00')",
        "INSERT INTO payments (lease_id, amount, paid_date) \
         VALUES (1, '40', '2024-06-15 10:30:00')",
    ] {
        _ = sqlx::query(stmt).execute(&pool).await.unwrap();
    }

    let rent_roll = service
        .execute(query::rent_roll::AsOf::by(service.today()))
        .await
        .unwrap();
    assert_eq!(rent_roll.len(), 1);
    assert_eq!(rent_roll[0].monthly_charges, money("100"));
    assert_eq!(rent_roll[0].monthly_payments, money("40"));

    let aging = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();
    let zero = "0.00";
    assert_eq!(
        aging_table(&aging),
        [["101", "60.00", zero, zero, zero, "60.00"]],
    );

    let details = service
        .execute(query::leases::Details::by(()))
        .await
        .unwrap();
    assert_eq!(details[0].lease.start_date, date("2024-06-30"));
}

#[tokio::test]
async fn reads_ledger_from_single_snapshot() {
    let pool = memory_pool().await;
    let service = service(&pool).await;
    seed(&pool).await;

    let ledger = service
        .execute(Ledger {
            as_of: service.today(),
        })
        .await
        .unwrap();

    let rent_roll = service
        .execute(query::rent_roll::AsOf::by(service.today()))
        .await
        .unwrap();
    let aging = service
        .execute(query::aging::AsOf::by(service.today()))
        .await
        .unwrap();
    assert_eq!(ledger.rent_roll, rent_roll);
    assert_eq!(ledger.aging, aging);

    // Snapshot is committed, so the only connection is usable again.
    let again = service
        .execute(Ledger {
            as_of: service.today(),
        })
        .await
        .unwrap();
    assert_eq!(again, ledger);
}
