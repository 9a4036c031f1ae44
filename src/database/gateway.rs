//! # Gateway
//!
//! Thin wrapper over a `bb8` pool of `tokio-postgres` clients.

use bb8::PooledConnection;
use bb8_postgres::{tokio_postgres::NoTls, PostgresConnectionManager};
use tokio_postgres::{types::ToSql, Row};
use tracing::{debug, info};

use super::config::DatabaseConfig;
use super::errors::{DatabaseError, DatabaseResult};

/// Connection pool type used throughout the service
pub type PgPool = bb8::Pool<PostgresConnectionManager<NoTls>>;

/// A pooled connection; derefs to [`tokio_postgres::Client`]
pub type PgConnection<'a> = PooledConnection<'a, PostgresConnectionManager<NoTls>>;

/// Handle to the relational store
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Build a pool for `config` and verify the store answers.
    pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        info!(host = %config.host, port = config.port, dbname = %config.dbname, "connecting to database");

        let manager = PostgresConnectionManager::new(config.pg_config(), NoTls);
        let pool = bb8::Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(config.connect_timeout())
            .build(manager)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let database = Self::from_pool(pool);
        database
            .ping()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        info!("database connection verified");
        Ok(database)
    }

    /// Wrap an existing pool without probing it
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip probe
    pub async fn ping(&self) -> DatabaseResult<()> {
        self.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    /// Check out a connection, e.g. to open a transaction.
    ///
    /// A `Transaction` started on the returned connection rolls back when
    /// dropped without `commit`.
    pub async fn connection(&self) -> DatabaseResult<PgConnection<'_>> {
        Ok(self.pool.get().await?)
    }

    /// Run a statement and collect every row
    pub async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DatabaseResult<Vec<Row>> {
        debug!(sql, "query");
        let conn = self.connection().await?;
        Ok(conn.query(sql, params).await?)
    }

    /// Run a statement that must return exactly one row
    pub async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DatabaseResult<Row> {
        debug!(sql, "query_one");
        let conn = self.connection().await?;
        Ok(conn.query_one(sql, params).await?)
    }

    /// Run a statement returning zero or one row
    pub async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DatabaseResult<Option<Row>> {
        debug!(sql, "query_opt");
        let conn = self.connection().await?;
        Ok(conn.query_opt(sql, params).await?)
    }

    /// Run a statement and return the number of affected rows
    pub async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DatabaseResult<u64> {
        debug!(sql, "execute");
        let conn = self.connection().await?;
        Ok(conn.execute(sql, params).await?)
    }
}

/// Convert a stored identifier or count to its unsigned model type
pub fn to_unsigned<T: TryFrom<i64>>(column: &'static str, value: i64) -> DatabaseResult<T> {
    T::try_from(value).map_err(|_| DatabaseError::OutOfRange { column, value })
}

/// Convert a model value that must be written to a `BIGINT` column
pub fn to_column(column: &'static str, value: u64) -> DatabaseResult<i64> {
    to_signed(value).ok_or(DatabaseError::TooLarge { column, value })
}

/// Convert a model identifier to the store's `BIGINT`.
///
/// `None` means the id is larger than any row the store can hold.
pub fn to_signed(value: u64) -> Option<i64> {
    i64::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_unsigned_in_range() {
        let id: u64 = to_unsigned("order_id", 42).unwrap();
        assert_eq!(id, 42);
        let qty: u32 = to_unsigned("quantity", 7).unwrap();
        assert_eq!(qty, 7);
    }

    #[test]
    fn test_to_unsigned_negative() {
        let result: DatabaseResult<u64> = to_unsigned("order_id", -1);
        assert!(matches!(
            result,
            Err(DatabaseError::OutOfRange { column: "order_id", value: -1 })
        ));
    }

    #[test]
    fn test_to_unsigned_too_large_for_u32() {
        let result: DatabaseResult<u32> = to_unsigned("quantity", i64::from(u32::MAX) + 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_column() {
        assert_eq!(to_column("quantity", 5_000_000_000).unwrap(), 5_000_000_000);
        assert!(matches!(
            to_column("quantity", u64::MAX),
            Err(DatabaseError::TooLarge { column: "quantity", .. })
        ));
    }

    #[test]
    fn test_to_signed() {
        assert_eq!(to_signed(5), Some(5));
        assert_eq!(to_signed(u64::MAX), None);
    }
}
