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
    read::aging,
};

use super::{get, get_money, money_sql};

impl<C> Database<Select<By<Vec<aging::Row>, Date>>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = Vec<aging::Row>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<aging::Row>, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "WITH due AS ( \
                 SELECT lease_id, \
                        SUM(amount) AS total, \
                        MAX(date(due_date)) AS last_due_date \
                 FROM charges \
                 WHERE date(due_date) <= ?1 \
                 GROUP BY lease_id \
             ), \
             paid AS ( \
                 SELECT lease_id, SUM(amount) AS total \
                 FROM payments \
                 WHERE date(paid_date) <= ?1 \
                 GROUP BY lease_id \
             ), \
             balances AS ( \
                 SELECT l.id, \
                        l.tenant_name, \
                        l.unit_no, \
                        ROUND(COALESCE(d.total, 0) - COALESCE(p.total, 0), 2) \
                            AS balance, \
                        CAST(julianday(?1) - julianday(d.last_due_date) \
                             AS INTEGER) AS days_past_due \
                 FROM leases AS l \
                 LEFT JOIN due AS d ON d.lease_id = l.id \
                 LEFT JOIN paid AS p ON p.lease_id = l.id \
             ) \
             SELECT id AS lease_id, \
                    tenant_name, \
                    unit_no, ",
            money_sql!(
                "CASE WHEN balance > 0 AND days_past_due <= 30 \
                      THEN balance ELSE 0 END"
            ),
            " AS bucket_0_30, ",
            money_sql!(
                "CASE WHEN balance > 0 AND days_past_due BETWEEN 31 AND 60 \
                      THEN balance ELSE 0 END"
            ),
            " AS bucket_31_60, ",
            money_sql!(
                "CASE WHEN balance > 0 AND days_past_due BETWEEN 61 AND 90 \
                      THEN balance ELSE 0 END"
            ),
            " AS bucket_61_90, ",
            money_sql!(
                "CASE WHEN balance > 0 AND days_past_due > 90 \
                      THEN balance ELSE 0 END"
            ),
            " AS bucket_90_plus, ",
            money_sql!(
                "CASE WHEN balance > 0 AND days_past_due IS NOT NULL \
                      THEN balance ELSE 0 END"
            ),
            " AS total_due \
             FROM balances \
             ORDER BY unit_no, id",
        );

        let query = sqlx::query(SQL).bind(by.into_inner().to_string());

        self.fetch_all(query)
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| -> Result<_, Self::Err> {
                Ok(aging::Row {
                    lease_id: get::<i64>(row, "lease_id")?.into(),
                    tenant_name: get::<String>(row, "tenant_name")?.into(),
                    unit_no: get::<String>(row, "unit_no")?.into(),
                    bucket_0_30: get_money(row, "bucket_0_30")?,
                    bucket_31_60: get_money(row, "bucket_31_60")?,
                    bucket_61_90: get_money(row, "bucket_61_90")?,
                    bucket_90_plus: get_money(row, "bucket_90_plus")?,
                    total_due: get_money(row, "total_due")?,
                })
            })
            .collect()
    }
}
