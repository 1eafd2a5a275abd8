use std::env;

use geodistance::{
    config::{GeoDistanceConfig, TableBinding},
    dialect::SqlDialect,
    GeoDistanceError, Result,
};
use sqlx::{MySqlPool, PgPool};

pub mod mysql;
pub mod postgres;
pub mod schema;
pub mod select;

pub(crate) fn convert_error(why: sqlx::Error) -> GeoDistanceError {
    GeoDistanceError::database(why)
}

pub struct DatabaseConnectionInfo {
    pub scheme: String,
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let scheme = env::var("DATABASE_SCHEME").ok()?;
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            scheme,
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.scheme,
            self.username,
            self.password,
            self.hostname,
            self.port,
            self.database
        )
    }
}

/// A connection to one of the supported database engines.
#[derive(Clone)]
pub enum GeoConnection {
    Postgres(PgPool),
    MySql(MySqlPool),
}

impl GeoConnection {
    /// Connects to `url`, dispatching on the url scheme. Unsupported engines
    /// fail with a configuration error before a connection is attempted.
    pub async fn connect(url: &str) -> Result<Self> {
        match SqlDialect::from_url(url)? {
            SqlDialect::Postgres => PgPool::connect(url)
                .await
                .map(Self::Postgres)
                .map_err(convert_error),
            SqlDialect::MySql => MySqlPool::connect(url)
                .await
                .map(Self::MySql)
                .map_err(convert_error),
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        match self {
            Self::Postgres(_) => SqlDialect::Postgres,
            Self::MySql(_) => SqlDialect::MySql,
        }
    }

    /// Validates the column configuration against the live schema and returns
    /// the immutable per-table binding.
    pub async fn attach(
        &self,
        table: &str,
        config: GeoDistanceConfig,
    ) -> Result<TableBinding> {
        TableBinding::attach(self, table, config).await
    }
}
