//! [`Storage`] definitions.

use common::operations::{By, Commit, Select, Transact, Transacted};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracerr::Traced;

use crate::infra::{database, Database, Postgres, Sqlite};

/// [`Database`] of the configured [`Dialect`].
///
/// Selected once on startup and dispatching every operation to the
/// underlying backend.
#[derive(Clone, Debug)]
pub enum Storage<Pg = Postgres, Lite = Sqlite> {
    /// [`Postgres`] backend.
    Postgres(Pg),

    /// [`Sqlite`] backend.
    Sqlite(Lite),
}

impl<Pg, Lite> Storage<Pg, Lite> {
    /// Returns the [`Dialect`] of this [`Storage`].
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        match self {
            Self::Postgres(_) => Dialect::Postgres,
            Self::Sqlite(_) => Dialect::Sqlite,
        }
    }
}

/// SQL flavor of a [`Storage`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumString,
    Eq,
    Hash,
    PartialEq,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    /// [SQLite] dialect.
    ///
    /// [SQLite]: https://sqlite.org
    #[default]
    Sqlite,

    /// [PostgreSQL] dialect.
    ///
    /// [PostgreSQL]: https://postgresql.org
    Postgres,
}

impl<Pg, Lite, W, B> Database<Select<By<W, B>>> for Storage<Pg, Lite>
where
    Pg: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
    Lite: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Select<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::Postgres(db) => db.execute(op).await,
            Self::Sqlite(db) => db.execute(op).await,
        }
        .map_err(tracerr::wrap!())
    }
}

impl<Pg, Lite> Database<Transact> for Storage<Pg, Lite>
where
    Pg: Database<Transact, Err = Traced<database::Error>>,
    Lite: Database<Transact, Err = Traced<database::Error>>,
{
    type Ok = Storage<Transacted<Pg>, Transacted<Lite>>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(match self {
            Self::Postgres(db) => Storage::Postgres(
                db.execute(Transact).await.map_err(tracerr::wrap!())?,
            ),
            Self::Sqlite(db) => Storage::Sqlite(
                db.execute(Transact).await.map_err(tracerr::wrap!())?,
            ),
        })
    }
}

impl<Pg, Lite> Database<Commit> for Storage<Pg, Lite>
where
    Pg: Database<Commit, Ok = (), Err = Traced<database::Error>>,
    Lite: Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::Postgres(db) => db.execute(Commit).await,
            Self::Sqlite(db) => db.execute(Commit).await,
        }
        .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Dialect;

    #[test]
    fn dialect_names() {
        assert_eq!(Dialect::Sqlite.to_string(), "sqlite");
        assert_eq!(Dialect::Postgres.to_string(), "postgres");
        assert_eq!(Dialect::from_str("postgres").unwrap(), Dialect::Postgres);
        assert!(Dialect::from_str("oracle").is_err());
        assert_eq!(Dialect::default(), Dialect::Sqlite);
        assert_eq!(
            serde_json::from_str::<Dialect>(r#""sqlite""#).unwrap(),
            Dialect::Sqlite,
        );
    }
}
