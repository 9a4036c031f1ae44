//! # Database Errors

use thiserror::Error;

/// Result type for gateway operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Failures talking to the relational store
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Pool construction or liveness probe failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Could not check a connection out of the pool
    #[error("Pool error: {0}")]
    Pool(#[from] bb8::RunError<tokio_postgres::Error>),

    /// Statement failed or a column could not be decoded
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A stored value does not fit the model type
    #[error("Value {value} out of range for column {column}")]
    OutOfRange { column: &'static str, value: i64 },

    /// A model value does not fit the column type
    #[error("Value {value} does not fit column {column}")]
    TooLarge { column: &'static str, value: u64 },
}
