//! [`Connection`] definitions.

use std::{fmt, future::Future, sync::Arc};

use futures::{FutureExt as _, TryFutureExt as _};
use ouroboros::self_referencing;
use tokio::sync::Mutex;
use tokio_postgres::{types::ToSql, IsolationLevel, Row};
use tracerr::Traced;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    Client, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use tokio_postgres::Error;

/// Postgres database connection able to run read queries.
pub trait Connection {
    /// Queries the provided statement with the given parameters and returns
    /// the resulting rows.
    ///
    /// # Errors
    ///
    /// If failed to query the statement.
    fn query(
        &self,
        stmt: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>>;
}

/// Runs every query on a separate [`Client`] acquired from this [`Pool`].
impl Connection for Pool {
    async fn query(
        &self,
        stmt: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        let client = self
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        client
            .query(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

/// Read-only transaction started on a [`Client`].
#[self_referencing]
struct Tx {
    /// [`Client`] the transaction is started on.
    client: Client,

    /// Transaction started on the [`Client`], until committed.
    #[borrows(mut client)]
    #[not_covariant]
    tx: Option<deadpool_postgres::Transaction<'this>>,
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_tx(|tx| {
            f.debug_struct("Tx")
                .field("committed", &tx.is_none())
                .finish_non_exhaustive()
        })
    }
}

impl Tx {
    /// Returns the underlying transaction of this [`Tx`].
    fn transaction(&self) -> &deadpool_postgres::Transaction<'_> {
        self.with_tx(|tx| tx.as_ref().expect("already committed"))
    }
}

/// Consistent read snapshot of a Postgres database.
///
/// Backed by a `REPEATABLE READ READ ONLY` transaction holding its own
/// [`Client`] until [`Snapshot::commit()`]ted.
#[derive(Clone, Debug)]
pub struct Snapshot(Arc<Mutex<Tx>>);

impl Snapshot {
    /// Starts a new [`Snapshot`] on a [`Client`] from the provided [`Pool`].
    ///
    /// # Errors
    ///
    /// If failed to acquire a [`Client`] or to start a transaction on it.
    pub async fn start(pool: &Pool) -> Result<Self, Traced<database::Error>> {
        let client = pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        let tx = Tx::try_new_async_send(client, |c| {
            c.build_transaction()
                .isolation_level(IsolationLevel::RepeatableRead)
                .read_only(true)
                .start()
                .map_ok(Some)
                .boxed()
        })
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)?;
        Ok(Self(Arc::new(Mutex::new(tx))))
    }

    /// Commits this [`Snapshot`], releasing its [`Client`] back to the
    /// [`Pool`] once all its clones are dropped.
    ///
    /// Committing an already committed [`Snapshot`] does nothing.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let mut guard = self.0.lock().await;
        #[expect(
            clippy::redundant_closure_for_method_calls,
            reason = "different variance, see \
                      https://doc.rust-lang.org/nomicon/subtyping.html#variance"
        )]
        let Some(tx) = guard.with_tx_mut(|tx| tx.take()) else {
            return Ok(());
        };
        tx.commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for Snapshot {
    async fn query(
        &self,
        stmt: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        self.0
            .lock()
            .await
            .transaction()
            .query(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}
