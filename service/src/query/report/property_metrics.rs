//! [`PropertyMetrics`] definition.

use std::collections::BTreeMap;

use common::{
    operations::{By, Select},
    Date, Money, Percent,
};
use itertools::Itertools as _;
use rust_decimal::Decimal;
use serde::Serialize;
use tracerr::Traced;

use crate::{
    domain::lease::UnitNo,
    infra::{database, Database},
    read::rent_roll,
    Query, Service,
};

/// [`Query`] to measure the occupancy and the revenue of the units.
///
/// Only the units leased during the current month are known.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PropertyMetrics {
    /// [`Date`] to measure the units as of.
    pub as_of: Date,
}

/// Output of the [`PropertyMetrics`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Output {
    /// Occupancy of the units.
    pub occupancy: Occupancy,

    /// Revenue of the units.
    pub revenue: Revenue,

    /// Up to 3 [`UnitRevenue`]s with the largest payments.
    pub top_units: Vec<UnitRevenue>,

    /// Human-readable observations.
    pub insights: Vec<String>,
}

/// Occupancy in the [`Output`] of the [`PropertyMetrics`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Occupancy {
    /// Number of distinct units.
    pub total_units: usize,

    /// Number of leases active during the current month.
    pub occupied: usize,

    /// Number of units without a lease.
    pub vacant: usize,

    /// Share of the occupied units.
    pub occupancy_rate: Percent,
}

/// Revenue in the [`Output`] of the [`PropertyMetrics`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Revenue {
    /// Sum of the charges of the current month.
    pub total_monthly: Money,

    /// Average charges of a single occupied unit.
    pub per_unit: Money,

    /// [`Revenue::total_monthly`] over a year.
    pub annualized: Money,
}

/// Revenue of a single unit in the current month.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UnitRevenue {
    /// [`UnitNo`] of the unit.
    pub unit: UnitNo,

    /// Sum of the payments for the unit.
    pub revenue: Money,

    /// Sum of the month balances of the unit.
    pub balance: Money,
}

impl Output {
    /// Measures the units of the provided `rent_roll` rows.
    #[must_use]
    pub fn new(rent_roll: &[rent_roll::Row]) -> Self {
        let mut units = BTreeMap::<&UnitNo, UnitRevenue>::new();
        for row in rent_roll {
            let unit =
                units.entry(&row.unit_no).or_insert_with(|| UnitRevenue {
                    unit: row.unit_no.clone(),
                    revenue: Money::ZERO,
                    balance: Money::ZERO,
                });
            unit.revenue += row.monthly_payments;
            unit.balance += row.month_balance;
        }

        let total_units = units.len();
        let occupied = rent_roll.len();
        let rate =
            Percent::ratio(Decimal::from(occupied), Decimal::from(total_units));
        let occupancy_rate = Percent::new(rate);

        let total_monthly: Money =
            rent_roll.iter().map(|r| r.monthly_charges).sum();
        let per_unit = total_monthly.per(occupied);
        let annualized = total_monthly * Decimal::from(12);

        Self {
            occupancy: Occupancy {
                total_units,
                occupied,
                vacant: total_units.saturating_sub(occupied),
                occupancy_rate,
            },
            revenue: Revenue {
                total_monthly,
                per_unit,
                annualized,
            },
            top_units: units
                .into_values()
                .sorted_by(|a, b| b.revenue.cmp(&a.revenue))
                .take(3)
                .collect(),
            insights: vec![
                format!(
                    "Occupancy rate of {occupancy_rate}% is {}",
                    occupancy_label(rate),
                ),
                format!("Average revenue per unit: ${per_unit}"),
                format!("Potential annual revenue: ${annualized}"),
            ],
        }
    }
}

/// Labels the provided unrounded occupancy `rate`, in percents.
fn occupancy_label(rate: Decimal) -> &'static str {
    if rate > Decimal::from(90) {
        "excellent"
    } else if rate > Decimal::from(75) {
        "good"
    } else {
        "needs improvement"
    }
}

impl<Db> Query<PropertyMetrics> for Service<Db>
where
    Db: Database<
        Select<By<Vec<rent_roll::Row>, Date>>,
        Ok = Vec<rent_roll::Row>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        PropertyMetrics { as_of }: PropertyMetrics,
    ) -> Result<Self::Ok, Self::Err> {
        let rent_roll = self
            .database()
            .execute(Select(By::<Vec<rent_roll::Row>, _>::new(as_of)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output::new(&rent_roll))
    }
}

#[cfg(test)]
mod spec {
    use common::{Money, Percent};
    use rust_decimal::Decimal;

    use crate::read::rent_roll;

    use super::{occupancy_label, Output};

    fn row(
        id: i64,
        unit: &str,
        charges: &str,
        payments: &str,
    ) -> rent_roll::Row {
        let charges: Money = charges.parse().unwrap();
        let payments: Money = payments.parse().unwrap();
        rent_roll::Row {
            lease_id: id.into(),
            tenant_name: format!("Tenant {id}").into(),
            unit_no: unit.into(),
            monthly_charges: charges,
            monthly_payments: payments,
            month_balance: charges - payments,
        }
    }

    #[test]
    fn measures_units() {
        let output = Output::new(&[
            row(5, "100", "1100", "500"),
            row(1, "101", "1000", "1000"),
            row(2, "102", "0", "0"),
            row(3, "103", "0", "0"),
        ]);

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!({
                "occupancy": {
                    "total_units": 4,
                    "occupied": 4,
                    "vacant": 0,
                    "occupancy_rate": 100.0,
                },
                "revenue": {
                    "total_monthly": "2100.00",
                    "per_unit": "525.00",
                    "annualized": "25200.00",
                },
                "top_units": [
                    {"unit": "101", "revenue": "1000.00", "balance": "0.00"},
                    {"unit": "100", "revenue": "500.00", "balance": "600.00"},
                    {"unit": "102", "revenue": "0.00", "balance": "0.00"},
                ],
                "insights": [
                    "Occupancy rate of 100.0% is excellent",
                    "Average revenue per unit: $525.00",
                    "Potential annual revenue: $25200.00",
                ],
            }),
        );
    }

    #[test]
    fn groups_leases_of_the_same_unit() {
        let output = Output::new(&[
            row(1, "201", "500", "100"),
            row(2, "201", "700", "300"),
            row(3, "202", "600", "600"),
        ]);

        assert_eq!(output.occupancy.total_units, 2);
        assert_eq!(output.occupancy.occupied, 3);
        assert_eq!(output.occupancy.vacant, 0);
        assert_eq!(output.occupancy.occupancy_rate.to_string(), "150.0");
        assert_eq!(output.top_units.len(), 2);
        assert_eq!(output.top_units[0].unit.as_ref(), "202");
        assert_eq!(
            output.top_units[1].revenue,
            "400".parse::<Money>().unwrap(),
        );
        assert_eq!(
            output.top_units[1].balance,
            "800".parse::<Money>().unwrap(),
        );
    }

    #[test]
    fn measures_no_units() {
        let output = Output::new(&[]);

        assert_eq!(output.occupancy.total_units, 0);
        assert_eq!(output.occupancy.occupancy_rate, Percent::ZERO);
        assert_eq!(output.revenue.per_unit, Money::ZERO);
        assert!(output.top_units.is_empty());
        assert_eq!(
            output.insights[0],
            "Occupancy rate of 0.0% is needs improvement",
        );
    }

    #[test]
    fn labels_occupancy() {
        let label = |s: &str| occupancy_label(s.parse::<Decimal>().unwrap());

        assert_eq!(label("91"), "excellent");
        assert_eq!(label("90.04"), "excellent");
        assert_eq!(label("90"), "good");
        assert_eq!(label("76"), "good");
        assert_eq!(label("75.04"), "good");
        assert_eq!(label("75"), "needs improvement");
        assert_eq!(label("0"), "needs improvement");
    }
}
