//! SQLite [`Database`] implementation.

pub mod connection;
mod impls;

use std::{path::PathBuf, time::Duration};

use derive_more::{Deref, Display, Error as StdError, From};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracerr::Traced;

use crate::infra::database::{self, ErrorKind};
#[cfg(doc)]
use crate::infra::Database;

pub use self::connection::{Connection, Pool, Snapshot};

/// SQLite [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Sqlite<C = Pool>(C);

/// [`Sqlite`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the database file.
    pub path: PathBuf,

    /// Indicator whether the database file should be created if it doesn't
    /// exist yet.
    pub create_if_missing: bool,

    /// Maximum number of connections in the [`Pool`].
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the [`Pool`].
    pub acquire_timeout: Duration,
}

impl Sqlite {
    /// Creates a new [`Sqlite`] client with the provided [`Config`].
    ///
    /// No connection is established until the first operation.
    #[must_use]
    pub fn new(conf: &Config) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(&conf.path)
            .create_if_missing(conf.create_if_missing)
            .foreign_keys(true);
        Self(
            SqlitePoolOptions::new()
                .max_connections(conf.max_connections)
                .acquire_timeout(conf.acquire_timeout)
                .connect_lazy_with(options),
        )
    }

    /// Creates a new [`Sqlite`] client on top of the provided [`Pool`].
    #[must_use]
    pub const fn from_pool(pool: Pool) -> Self {
        Self(pool)
    }

    /// Applies the pending schema migrations.
    ///
    /// # Errors
    ///
    /// If failed to apply any of the migrations.
    pub async fn migrate(&self) -> Result<(), Traced<database::Error>> {
        sqlx::migrate!("../migrations/sqlite")
            .run(&self.0)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// SQLite database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Error of running a query.
    #[display("Query failed: {_0}")]
    Query(sqlx::Error),

    /// Error of applying schema migrations.
    #[display("Migration failed: {_0}")]
    Migration(sqlx::migrate::MigrateError),

    /// Error of decoding a date stored as text.
    #[display("Failed to decode `{column}` column: {source}")]
    #[from(ignore)]
    InvalidDate {
        /// Name of the undecodable column.
        column: &'static str,

        /// Parsing error.
        source: common::date::ParseError,
    },
}

impl Error {
    /// Returns the [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Query(e) => {
                if is_unavailable(e) {
                    ErrorKind::StorageUnavailable
                } else {
                    ErrorKind::Schema
                }
            }
            Self::Migration(_) | Self::InvalidDate { .. } => ErrorKind::Schema,
        }
    }
}

/// Checks whether the provided [`sqlx::Error`] means that the database cannot
/// be reached.
fn is_unavailable(e: &sqlx::Error) -> bool {
    /// Primary result codes of `SQLITE_BUSY`, `SQLITE_LOCKED` and
    /// `SQLITE_CANTOPEN`.
    const UNAVAILABLE_CODES: [i32; 3] = [5, 6, 14];

    #[expect(clippy::wildcard_enum_match_arm, reason = "non-exhaustive")]
    match e {
        sqlx::Error::Configuration(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(e) => e
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .is_some_and(|code| UNAVAILABLE_CODES.contains(&(code & 0xff))),
        _ => false,
    }
}
