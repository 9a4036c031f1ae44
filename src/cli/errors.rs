//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::io;

use thiserror::Error;

use crate::database::DatabaseError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read or parsed
    #[error("{0}")]
    Config(String),

    /// Database unreachable or failing
    #[error("{0}")]
    Database(#[from] DatabaseError),

    /// Socket or stdio failure
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "ORDERD_CLI_CONFIG_ERROR",
            Self::Database(_) => "ORDERD_CLI_DATABASE_ERROR",
            Self::Io(_) => "ORDERD_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
