//! [`Database`] implementations.

mod aging;
mod lease;
mod rent_roll;

use async_trait::async_trait;
use common::{
    operations::{Commit, Transact},
    Money,
};
use postgres_types::FromSql;
use refinery_core::{
    traits::r#async::{AsyncQuery, AsyncTransaction},
    AsyncMigrate, Migration,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::infra::{
    database::{self, decode},
    postgres, Database,
};

use super::{Pool, Postgres, Snapshot};

/// Formats a `NUMERIC` SQL expression as a string with exactly 2 fractional
/// digits.
macro_rules! money_sql {
    ($expr:literal) => {
        concat!("to_char(", $expr, ", 'FM999999999990.00')")
    };
}
use money_sql;

/// Reads the value of the provided `column` from the [`Row`].
///
/// # Errors
///
/// If the `column` is missing or is of an unexpected type.
fn get<'r, T>(
    row: &'r Row,
    column: &'static str,
) -> Result<T, Traced<database::Error>>
where
    T: FromSql<'r>,
{
    row.try_get(column)
        .map_err(|source| {
            tracerr::new!(postgres::Error::Decode { column, source })
        })
        .map_err(tracerr::map_from)
}

/// Reads the [`Money`] amount of the provided `column` from the [`Row`].
///
/// # Errors
///
/// If the `column` is missing or is not textual.
fn get_money(
    row: &Row,
    column: &'static str,
) -> Result<Money, Traced<database::Error>> {
    get::<Option<&str>>(row, column).map(|raw| decode::money(column, raw))
}

impl Database<Transact> for Postgres<Pool> {
    type Ok = Postgres<Snapshot>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Snapshot::start(&self.0)
            .await
            .map(Postgres)
            .map_err(tracerr::wrap!())
    }
}

impl Database<Transact> for Postgres<Snapshot> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Postgres<Snapshot> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

#[async_trait]
impl AsyncTransaction for Postgres {
    type Error = Traced<database::Error>;

    async fn execute(
        &mut self,
        queries: &[&str],
    ) -> Result<usize, Self::Error> {
        let mut client = self
            .0
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        AsyncTransaction::execute(&mut **client, queries)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

#[async_trait]
impl AsyncQuery<Vec<Migration>> for Postgres {
    async fn query(
        &mut self,
        query: &str,
    ) -> Result<Vec<Migration>, <Self as AsyncTransaction>::Error> {
        let mut client = self
            .0
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        AsyncQuery::query(&mut **client, query)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl AsyncMigrate for Postgres {}
