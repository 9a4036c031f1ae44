//! CLI module for orderd
//!
//! Provides command-line interface for:
//! - serve: connect to the database and serve the HTTP API
//! - check: verify the database answers

mod args;
mod commands;
mod errors;

pub use args::{CheckArgs, Cli, Command, DatabaseArgs, HttpArgs, ServeArgs};
pub use commands::{check, run_command, serve, Config};
pub use errors::{CliError, CliResult};

use crate::observability;

/// Parse arguments, install logging and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    observability::init_logging();
    run_command(cli.command).await
}
