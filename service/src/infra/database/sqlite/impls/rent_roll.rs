use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

use crate::{
    infra::{
        database::{self, sqlite::Connection, Sqlite},
        Database,
    },
    read::rent_roll,
};

use super::{get, get_money, money_sql};

impl<C> Database<Select<By<Vec<rent_roll::Row>, Date>>> for Sqlite<C>
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
                 WHERE date(due_date) BETWEEN ?1 AND ?2 \
                 GROUP BY lease_id \
             ), \
             month_payments AS ( \
                 SELECT lease_id, SUM(amount) AS total \
                 FROM payments \
                 WHERE date(paid_date) BETWEEN ?1 AND ?2 \
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
             WHERE date(l.start_date) <= ?2 \
               AND (l.end_date IS NULL OR date(l.end_date) >= ?1) \
             ORDER BY l.unit_no, l.id",
        );

        let today = by.into_inner();
        let query = sqlx::query(SQL)
            .bind(today.month_start().to_string())
            .bind(today.month_end().to_string());

        self.fetch_all(query)
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| -> Result<_, Self::Err> {
                Ok(rent_roll::Row {
                    lease_id: get::<i64>(row, "lease_id")?.into(),
                    tenant_name: get::<String>(row, "tenant_name")?.into(),
                    unit_no: get::<String>(row, "unit_no")?.into(),
                    monthly_charges: get_money(row, "monthly_charges")?,
                    monthly_payments: get_money(row, "monthly_payments")?,
                    month_balance: get_money(row, "month_balance")?,
                })
            })
            .collect()
    }
}
