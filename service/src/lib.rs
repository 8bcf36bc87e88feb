//! Service contains the reporting logic of the application.
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use common::Date;

#[cfg(test)]
use serde_json as _;

#[cfg(doc)]
use infra::Database;

pub use self::query::Query;

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// [`Date`] every report is evaluated as of.
    ///
    /// The current UTC [`Date`] is used, if [`None`].
    pub as_of: Option<Date>,
}

/// Reporting service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the [`Date`] reports should be evaluated as of.
    #[must_use]
    pub fn today(&self) -> Date {
        self.config.as_of.unwrap_or_else(Date::today)
    }
}
