//! Postgres [`Database`] implementation.

pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::NoTls;
use tracerr::Traced;

use crate::infra::database::{self, ErrorKind};
#[cfg(doc)]
use crate::infra::Database;

pub use deadpool_postgres::{Config, PoolConfig};
pub use refinery::embed_migrations;

pub use self::connection::{Connection, Pool, Snapshot};

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<C = Pool>(C);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// No connection is established until the first operation.
    ///
    /// # Errors
    ///
    /// If the provided [`Config`] is invalid.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        conf.create_pool(Some(Runtime::Tokio1), NoTls)
            .map(Self)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of decoding a column of a returned row.
    #[display("Failed to decode `{column}` column: {source}")]
    #[from(ignore)]
    Decode {
        /// Name of the undecodable column.
        column: &'static str,

        /// Decoding error.
        source: connection::Error,
    },

    /// Error of creating a new [`Pool`].
    #[display("Failed to create a new `Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`Pool`] error.
    #[display("`Pool` error: {_0}")]
    PoolError(connection::PoolError),
}

impl Error {
    /// Returns the [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(e) => match e.code() {
                // Connection exception, operator intervention, insufficient
                // resources and invalid authorization classes.
                Some(code)
                    if ["08", "57", "53", "28"]
                        .iter()
                        .any(|class| code.code().starts_with(class)) =>
                {
                    ErrorKind::StorageUnavailable
                }
                Some(_) => ErrorKind::Schema,
                None => ErrorKind::StorageUnavailable,
            },
            Self::Decode { .. } => ErrorKind::Schema,
            Self::PoolCreationError(_) | Self::PoolError(_) => {
                ErrorKind::StorageUnavailable
            }
        }
    }
}
