//! [`Database`]-related implementations.

mod decode;
pub mod postgres;
pub mod sqlite;
mod storage;

use derive_more::{Display, Error as StdError, From};

pub use self::{
    postgres::Postgres,
    sqlite::Sqlite,
    storage::{Dialect, Storage},
};

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    /// [`Sqlite`] error.
    Sqlite(sqlite::Error),
}

impl Error {
    /// Returns the [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Postgres(e) => e.kind(),
            Self::Sqlite(e) => e.kind(),
        }
    }
}

/// Kind of a [`Database`] [`Error`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
    /// Storage cannot be reached: connection, authentication or pool failure.
    #[display("storage unavailable")]
    StorageUnavailable,

    /// Storage schema doesn't match the expected one: missing tables or
    /// columns, rejected statements, undecodable values or failed migrations.
    #[display("schema error")]
    Schema,
}
