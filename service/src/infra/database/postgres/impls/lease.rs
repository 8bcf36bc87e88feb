use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Lease,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::lease,
};

use super::{get, get_money, money_sql};

impl<C> Database<Select<By<Vec<lease::Details>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<lease::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<lease::Details>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "WITH charge_totals AS ( \
                 SELECT lease_id, COUNT(*) AS count, SUM(amount) AS total \
                 FROM charges \
                 GROUP BY lease_id \
             ), \
             payment_totals AS ( \
                 SELECT lease_id, COUNT(*) AS count, SUM(amount) AS total \
                 FROM payments \
                 GROUP BY lease_id \
             ) \
             SELECT l.id, \
                    l.tenant_name, \
                    l.unit_no, \
                    l.start_date, \
                    l.end_date, ",
            money_sql!("l.monthly_rent"),
            " AS monthly_rent, \
                    COALESCE(c.count, 0) AS charge_count, \
                    COALESCE(p.count, 0) AS payment_count, ",
            money_sql!("COALESCE(c.total, 0)"),
            " AS total_charges, ",
            money_sql!("COALESCE(p.total, 0)"),
            " AS total_payments \
             FROM leases AS l \
             LEFT JOIN charge_totals AS c ON c.lease_id = l.id \
             LEFT JOIN payment_totals AS p ON p.lease_id = l.id \
             ORDER BY l.unit_no COLLATE \"C\", l.id",
        );

        self.query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| -> Result<_, Self::Err> {
                Ok(lease::Details {
                    lease: Lease {
                        id: get(row, "id")?,
                        tenant_name: get(row, "tenant_name")?,
                        unit_no: get(row, "unit_no")?,
                        start_date: get(row, "start_date")?,
                        end_date: get(row, "end_date")?,
                        monthly_rent: get_money(row, "monthly_rent")?,
                    },
                    charge_count: get(row, "charge_count")?,
                    payment_count: get(row, "payment_count")?,
                    total_charges: get_money(row, "total_charges")?,
                    total_payments: get_money(row, "total_payments")?,
                })
            })
            .collect()
    }
}
