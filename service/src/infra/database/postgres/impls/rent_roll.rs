use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

use crate::{
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::rent_roll,
};

use super::{get, get_money, money_sql};

impl<C> Database<Select<By<Vec<rent_roll::Row>, Date>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<rent_roll::Row>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<rent_roll::Row>, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "WITH month_charges AS ( \
                 SELECT lease_id, SUM(amount) AS total \
                 FROM charges \
                 WHERE due_date BETWEEN $1::DATE AND $2::DATE \
                 GROUP BY lease_id \
             ), \
             month_payments AS ( \
                 SELECT lease_id, SUM(amount) AS total \
                 FROM payments \
                 WHERE paid_date BETWEEN $1::DATE AND $2::DATE \
                 GROUP BY lease_id \
             ) \
             SELECT l.id AS lease_id, \
                    l.tenant_name, \
                    l.unit_no, ",
            money_sql!("COALESCE(c.total, 0)"),
            " AS monthly_charges, ",
            money_sql!("COALESCE(p.total, 0)"),
            " AS monthly_payments, ",
            money_sql!("COALESCE(c.total, 0) - COALESCE(p.total, 0)"),
            " AS month_balance \
             FROM leases AS l \
             LEFT JOIN month_charges AS c ON c.lease_id = l.id \
             LEFT JOIN month_payments AS p ON p.lease_id = l.id \
             WHERE l.start_date <= $2::DATE \
               AND (l.end_date IS NULL OR l.end_date >= $1::DATE) \
             ORDER BY l.unit_no COLLATE \"C\", l.id",
        );

        let today = by.into_inner();
        let (start, end) = (today.month_start(), today.month_end());

        self.query(SQL, &[&start, &end])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| -> Result<_, Self::Err> {
                Ok(rent_roll::Row {
                    lease_id: get(row, "lease_id")?,
                    tenant_name: get(row, "tenant_name")?,
                    unit_no: get(row, "unit_no")?,
                    monthly_charges: get_money(row, "monthly_charges")?,
                    monthly_payments: get_money(row, "monthly_payments")?,
                    month_balance: get_money(row, "month_balance")?,
                })
            })
            .collect()
    }
}
