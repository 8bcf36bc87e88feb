//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use common::Date;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::{ExposeSecret as _, SecretBox};
use serde::Deserialize;
use service::infra::{postgres, sqlite, Dialect};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Storage configuration.
    pub storage: Storage,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Service {
    /// [`Date`] to evaluate every report as of.
    ///
    /// The current UTC [`Date`] is used, if not set.
    pub as_of: Option<Date>,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service { as_of } = value;
        Self { as_of }
    }
}

/// Storage configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    /// [`Dialect`] of the storage to use.
    pub dialect: Dialect,

    /// SQLite configuration, used with the [`Dialect::Sqlite`].
    pub sqlite: Sqlite,

    /// Postgres configuration, used with the [`Dialect::Postgres`].
    pub postgres: Postgres,

    /// Maximum time to wait for a free connection.
    #[default(time::Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: time::Duration,
}

/// SQLite configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Sqlite {
    /// Path to the database file.
    #[default("leaseledger.db".into())]
    pub path: PathBuf,

    /// Indicator whether the database file should be created on the first
    /// start.
    #[default(true)]
    pub create_if_missing: bool,

    /// Maximum number of pooled connections.
    #[default(4)]
    pub max_connections: u32,
}

impl From<&Storage> for sqlite::Config {
    fn from(value: &Storage) -> Self {
        let Sqlite {
            path,
            create_if_missing,
            max_connections,
        } = &value.sqlite;

        Self {
            path: path.clone(),
            create_if_missing: *create_if_missing,
            max_connections: *max_connections,
            acquire_timeout: value.acquire_timeout,
        }
    }
}

/// Postgres configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default(SecretBox::init_with(|| "postgres".to_owned()))]
    pub password: SecretBox<String>,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,

    /// Maximum number of pooled connections.
    #[default(16)]
    pub max_connections: usize,
}

impl From<&Storage> for postgres::Config {
    fn from(value: &Storage) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
            max_connections,
        } = &value.postgres;

        let mut pool = postgres::PoolConfig::new(*max_connections);
        pool.timeouts.wait = Some(value.acquire_timeout);

        Self {
            host: Some(host.clone()),
            port: Some(*port),
            user: Some(user.clone()),
            password: Some(password.expose_secret().clone()),
            dbname: Some(dbname.clone()),
            pool: Some(pool),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
