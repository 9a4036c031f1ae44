//! CLI command implementations

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::{Database, DatabaseConfig};
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::rest_api::PostgresOrderStore;

use super::args::{CheckArgs, Command, DatabaseArgs, HttpArgs, ServeArgs};
use super::errors::{CliError, CliResult};

/// Configuration file structure
///
/// ```json
/// { "http": { "port": 3030 }, "database": { "host": "database", "password": "pass" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file if one was given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.database.max_connections == 0 {
            return Err(CliError::config_error("database.max_connections must be > 0"));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(CliError::config_error("database.connect_timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Apply command-line / environment overrides on top of this config
    pub fn apply_http(&mut self, args: HttpArgs) {
        if let Some(host) = args.host {
            self.http.host = host;
        }
        if let Some(port) = args.port {
            self.http.port = port;
        }
        if !args.cors_origins.is_empty() {
            self.http.cors_origins = args.cors_origins;
        }
    }

    /// Apply command-line / environment overrides on top of this config
    pub fn apply_database(&mut self, args: DatabaseArgs) -> CliResult<()> {
        let db = &mut self.database;
        if let Some(host) = args.db_host {
            db.host = host;
        }
        if let Some(port) = args.db_port {
            db.port = port;
        }
        if let Some(user) = args.db_user {
            db.user = user;
        }
        if let Some(password) = args.db_password {
            db.password = password;
        }
        if let Some(name) = args.db_name {
            db.dbname = name;
        }
        if let Some(max) = args.db_max_connections {
            db.max_connections = max;
        }
        self.validate()
    }
}

/// Run a CLI command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve(args) => serve(args).await,
        Command::Check(args) => check(args).await,
    }
}

/// Connect to the database and serve the HTTP API until Ctrl-C
pub async fn serve(args: ServeArgs) -> CliResult<()> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.apply_http(args.http);
    config.apply_database(args.database)?;

    let db = Database::connect(&config.database).await?;
    let server = HttpServer::new(config.http, PostgresOrderStore::new(db));
    server.start().await?;

    Ok(())
}

/// Connect to the database and report whether it answers
pub async fn check(args: CheckArgs) -> CliResult<()> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.apply_database(args.database)?;

    Database::connect(&config.database).await?;
    info!(host = %config.database.host, dbname = %config.database.dbname, "database is reachable");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("orderd-{}-{}.json", name, std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config.http.port, 3030);
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn test_load_partial_file() {
        let path = write_config("partial", r#"{"database": {"host": "database", "password": "pass"}}"#);
        let config = Config::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.database.host, "database");
        assert_eq!(config.database.password, "pass");
        assert_eq!(config.http.port, 3030);
    }

    #[test]
    fn test_load_invalid_json() {
        let path = write_config("invalid", "{");
        let result = Config::load(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/orderd.json"));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.apply_http(HttpArgs {
            port: Some(9000),
            ..Default::default()
        });
        config
            .apply_database(DatabaseArgs {
                db_name: Some("orders_test".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.database.dbname, "orders_test");
        assert_eq!(config.database.host, "localhost");
    }

    #[test]
    fn test_zero_connections_rejected() {
        let mut config = Config::default();
        let result = config.apply_database(DatabaseArgs {
            db_max_connections: Some(0),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
