//! # Persistence Gateway
//!
//! Pooled PostgreSQL access for the order service.
//!
//! [`Database::connect`] refuses to hand out a handle until a round-trip
//! probe succeeds. All statements take positional parameters; nothing is
//! interpolated into SQL text.

pub mod config;
pub mod errors;
pub mod gateway;

pub use config::DatabaseConfig;
pub use errors::{DatabaseError, DatabaseResult};
pub use gateway::{Database, PgPool};
