//! [`FinancialInsights`] definition.

use common::{
    operations::{By, Select},
    Date, Money, Percent,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    read::rent_roll,
    Query, Service,
};

/// Assumed monthly growth of the charges, in percents.
const GROWTH_RATE: Decimal = Decimal::TWO;

/// Collection rate above which payment behavior is considered good, in
/// percents.
const GOOD_COLLECTION_RATE: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// [`Query`] to summarize the revenue of the current month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FinancialInsights {
    /// [`Date`] to summarize the revenue as of.
    pub as_of: Date,
}

/// Output of the [`FinancialInsights`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Output {
    /// Revenue of the current month.
    pub revenue: Revenue,

    /// Revenue expected in the next month.
    pub projections: Projections,

    /// Human-readable advice.
    pub recommendations: Vec<String>,
}

/// Revenue in the [`Output`] of the [`FinancialInsights`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Revenue {
    /// Sum of the charges of the current month.
    pub total_charges: Money,

    /// Sum of the payments of the current month.
    pub total_payments: Money,

    /// [`Revenue::total_charges`] not covered by the
    /// [`Revenue::total_payments`].
    pub outstanding: Money,

    /// Share of the [`Revenue::total_charges`] being paid.
    pub collection_rate: Percent,

    /// Average charges of a single lease.
    pub avg_lease_value: Money,
}

/// Projections in the [`Output`] of the [`FinancialInsights`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Projections {
    /// Charges expected in the next month.
    pub next_month_projected: Money,

    /// Assumed monthly growth of the charges.
    pub growth_rate: Percent,
}

impl Output {
    /// Summarizes the provided `rent_roll` rows.
    #[must_use]
    pub fn new(rent_roll: &[rent_roll::Row]) -> Self {
        let total_charges: Money =
            rent_roll.iter().map(|r| r.monthly_charges).sum();
        let total_payments: Money =
            rent_roll.iter().map(|r| r.monthly_payments).sum();
        let rate =
            Percent::ratio(total_payments.amount(), total_charges.amount());
        let collection_rate = Percent::new(rate);

        let growth = Decimal::ONE + GROWTH_RATE / Decimal::ONE_HUNDRED;

        Self {
            revenue: Revenue {
                total_charges,
                total_payments,
                outstanding: total_charges - total_payments,
                collection_rate,
                avg_lease_value: total_charges.per(rent_roll.len()),
            },
            projections: Projections {
                next_month_projected: total_charges * growth,
                growth_rate: Percent::new(GROWTH_RATE),
            },
            recommendations: vec![
                "Focus on collecting outstanding balances to improve cash flow"
                    .to_owned(),
                format!(
                    "Collection rate of {collection_rate}% indicates {} \
                     payment behavior",
                    if rate > GOOD_COLLECTION_RATE {
                        "good"
                    } else {
                        "needs improvement"
                    },
                ),
                "Consider incentives for early payments to improve collection \
                 rate"
                    .to_owned(),
            ],
        }
    }
}

impl<Db> Query<FinancialInsights> for Service<Db>
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
        FinancialInsights { as_of }: FinancialInsights,
    ) -> Result<Self::Ok, Self::Err> {
        let rent_roll = self
            .database()
            .execute(Select(By::<Vec<rent_roll::Row>, _>::new(as_of)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output::new(&rent_roll))
    }
}
