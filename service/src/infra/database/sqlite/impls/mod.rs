//! [`Database`] implementations.

mod aging;
mod lease;
mod rent_roll;

use common::{
    operations::{Commit, Transact},
    Date, Money,
};
use sqlx::{sqlite::SqliteRow, Row as _};
use tracerr::Traced;

use crate::infra::{
    database::{self, decode},
    sqlite, Database,
};

use super::{Pool, Snapshot, Sqlite};

/// Formats a numeric SQL expression as a string with exactly 2 fractional
/// digits.
macro_rules! money_sql {
    ($expr:literal) => {
        concat!("printf('%.2f', ", $expr, ")")
    };
}
use money_sql;

/// Reads the value of the provided `column` from the [`SqliteRow`].
///
/// # Errors
///
/// If the `column` is missing or is of an unexpected type.
fn get<'r, T>(
    row: &'r SqliteRow,
    column: &'static str,
) -> Result<T, Traced<database::Error>>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
        .map_err(tracerr::map_from)
}

/// Reads the [`Money`] amount of the provided `column` from the
/// [`SqliteRow`].
///
/// # Errors
///
/// If the `column` is missing or is not textual.
fn get_money(
    row: &SqliteRow,
    column: &'static str,
) -> Result<Money, Traced<database::Error>> {
    get::<Option<&str>>(row, column).map(|raw| decode::money(column, raw))
}

/// Reads the [`Date`] of the provided `column` from the [`SqliteRow`].
///
/// Dates are stored as `YYYY-MM-DD` text.
///
/// # Errors
///
/// If the `column` is missing or doesn't contain a valid [`Date`].
fn get_date(
    row: &SqliteRow,
    column: &'static str,
) -> Result<Date, Traced<database::Error>> {
    get::<&str>(row, column)
        .map_err(tracerr::wrap!())?
        .parse()
        .map_err(|source| {
            tracerr::new!(sqlite::Error::InvalidDate { column, source })
        })
        .map_err(tracerr::map_from)
}

/// Reads the optional [`Date`] of the provided `column` from the
/// [`SqliteRow`].
///
/// # Errors
///
/// If the `column` is missing or doesn't contain a valid [`Date`].
fn get_opt_date(
    row: &SqliteRow,
    column: &'static str,
) -> Result<Option<Date>, Traced<database::Error>> {
    match get::<Option<&str>>(row, column).map_err(tracerr::wrap!())? {
        Some(_) => get_date(row, column).map(Some),
        None => Ok(None),
    }
}

impl Database<Transact> for Sqlite<Pool> {
    type Ok = Sqlite<Snapshot>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Snapshot::start(&self.0)
            .await
            .map(Sqlite)
            .map_err(tracerr::wrap!())
    }
}

impl Database<Transact> for Sqlite<Snapshot> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Sqlite<Snapshot> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}
