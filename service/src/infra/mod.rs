//! Infrastructure layer.

pub mod database;

pub use self::database::{
    postgres, sqlite, Database, Dialect, Postgres, Sqlite, Storage,
};
