//! Database Configuration
//!
//! Coordinates of the PostgreSQL store and pool sizing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// PostgreSQL connection configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Host name (default: "localhost")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port (default: 5432)
    #[serde(default = "default_port")]
    pub port: u16,

    /// User name (default: "postgres")
    #[serde(default = "default_user")]
    pub user: String,

    /// Password (default: empty)
    #[serde(default)]
    pub password: String,

    /// Database name (default: "orders_by")
    #[serde(default = "default_dbname")]
    pub dbname: String,

    /// Maximum pooled connections (default: 10)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection (default: 30)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_dbname() -> String {
    "orders_by".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            dbname: default_dbname(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    /// Driver configuration for these coordinates.
    ///
    /// Values go through the typed setters, so passwords or names with
    /// spaces and quotes need no escaping.
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(&self.dbname)
            .connect_timeout(self.connect_timeout());
        if !self.password.is_empty() {
            pg.password(&self.password);
        }
        pg
    }

    /// How long to wait for a pooled connection
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// Hand-written so the password never shows up in logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
