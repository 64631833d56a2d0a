//! Server Configuration
//!
//! Defaults, then an optional `report-store.toml` in the working directory,
//! then environment variables (`PORT`, `DB_HOST`, `DB_USER`, ...).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use storage::MySqlSettings;

/// Which repository backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Mysql,
    Sqlite,
    Memory,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Repository backend
    pub store: StoreKind,

    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_database: String,
    pub db_max_connections: u32,

    /// SQLite database file, or `:memory:`
    pub sqlite_path: String,
    /// Create the reports table on startup
    pub init_schema: bool,

    pub log_format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
}

impl ApiConfig {
    /// Load configuration from the file and process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Environment::default())
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        let mysql = MySqlSettings::default();

        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("store", "mysql")?
            .set_default("db_host", mysql.host)?
            .set_default("db_port", i64::from(mysql.port))?
            .set_default("db_user", mysql.user)?
            .set_default("db_password", mysql.password)?
            .set_default("db_database", mysql.database)?
            .set_default("db_max_connections", i64::from(mysql.max_connections))?
            .set_default("sqlite_path", "report-store.db")?
            .set_default("init_schema", true)?
            .set_default("log_format", "pretty")?
            .set_default("log_level", "info")?
            .set_default("metrics_enabled", true)?
            .add_source(File::with_name("report-store").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection settings for the MySQL repository
    pub fn mysql_settings(&self) -> MySqlSettings {
        MySqlSettings {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_database.clone(),
            max_connections: self.db_max_connections,
        }
    }
}
