//! CLI argument definitions using clap
//!
//! Commands:
//! - orderd serve [--config <path>] [overrides]
//! - orderd check [--config <path>] [overrides]
//!
//! Every override can also come from the environment variable named in its
//! help text. Anything left unset falls back to the config file, then to the
//! built-in defaults.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// orderd - HTTP service for orders and their line items
#[derive(Parser, Debug)]
#[command(name = "orderd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the database and serve the HTTP API
    Serve(ServeArgs),

    /// Connect to the database, verify it answers, and exit
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long, env = "ORDERD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub http: HttpArgs,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to a JSON configuration file
    #[arg(long, env = "ORDERD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Args, Debug, Default)]
pub struct HttpArgs {
    /// Address to bind
    #[arg(long, env = "HTTP_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "HTTP_PORT")]
    pub port: Option<u16>,

    /// Allowed CORS origin (repeatable, or comma separated)
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct DatabaseArgs {
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, env = "DB_PORT")]
    pub db_port: Option<u16>,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS")]
    pub db_max_connections: Option<u32>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
