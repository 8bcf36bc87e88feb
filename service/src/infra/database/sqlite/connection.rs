//! [`Connection`] definitions.

use std::{future::Future, sync::Arc};

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::infra::database::{self, sqlite};

pub use sqlx::sqlite::SqlitePool as Pool;

/// Prepared SQLite query along with its bound arguments.
pub type Query<'q> = sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

/// SQLite database connection able to run read queries.
pub trait Connection {
    /// Runs the provided [`Query`] and returns all the resulting rows.
    ///
    /// # Errors
    ///
    /// If failed to run the [`Query`].
    fn fetch_all<'q>(
        &self,
        query: Query<'q>,
    ) -> impl Future<Output = Result<Vec<SqliteRow>, Traced<database::Error>>>;
}

impl Connection for Pool {
    async fn fetch_all<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<Vec<SqliteRow>, Traced<database::Error>> {
        query
            .fetch_all(self)
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}

/// Consistent read snapshot of a SQLite database.
///
/// Backed by a deferred transaction holding its own connection until
/// [`Snapshot::commit()`]ted.
#[derive(Clone, Debug)]
pub struct Snapshot(
    Arc<Mutex<Option<sqlx::Transaction<'static, sqlx::Sqlite>>>>,
);

impl Snapshot {
    /// Starts a new [`Snapshot`] on a connection from the provided [`Pool`].
    ///
    /// # Errors
    ///
    /// If failed to acquire a connection or to start a transaction on it.
    pub async fn start(pool: &Pool) -> Result<Self, Traced<database::Error>> {
        let tx = pool
            .begin()
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(Arc::new(Mutex::new(Some(tx)))))
    }

    /// Commits this [`Snapshot`], releasing its connection back to the
    /// [`Pool`].
    ///
    /// Committing an already committed [`Snapshot`] does nothing.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.0.lock().await.take() else {
            return Ok(());
        };
        tx.commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for Snapshot {
    async fn fetch_all<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<Vec<SqliteRow>, Traced<database::Error>> {
        let mut tx = self.0.lock().await;
        let tx = tx.as_mut().expect("already committed");
        query
            .fetch_all(&mut **tx)
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}
