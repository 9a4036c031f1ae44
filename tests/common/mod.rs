//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use orderd::database::{Database, DatabaseConfig};
use orderd::model::{ItemRequest, OrderRequest};
use testcontainers::ContainerAsync;
use testcontainers_modules::{postgres, testcontainers::runners::AsyncRunner};
use tracing::Level;

#[ctor::ctor]
fn init_tracing() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|l| Level::from_str(&l).ok())
        .unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_test_writer().try_init();
}

/// Start a throwaway Postgres with the service schema applied
pub async fn create_postgres_container() -> Result<(ContainerAsync<postgres::Postgres>, Database)> {
    let container: ContainerAsync<postgres::Postgres> = postgres::Postgres::default()
        .with_db_name("orders_by")
        .with_user("postgres")
        .with_password("postgres")
        .with_init_sql(include_str!("../../schema.sql").to_string().into_bytes())
        .start()
        .await?;

    let db = Database::connect(&postgres_config(&container).await?).await?;

    Ok((container, db))
}

/// Coordinates of a running container, as the superuser
pub async fn postgres_config(container: &ContainerAsync<postgres::Postgres>) -> Result<DatabaseConfig> {
    Ok(DatabaseConfig {
        host: container.get_host().await?.to_string(),
        port: container.get_host_port_ipv4(5432).await?,
        user: "postgres".to_string(),
        password: "postgres".to_string(),
        dbname: "orders_by".to_string(),
        max_connections: 4,
        connect_timeout_secs: 30,
    })
}

pub fn ordered_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 11, 9, 21, 21, 46).unwrap()
}

/// Order request with `item_count` items named after the customer
pub fn order_request(customer: &str, item_count: u32) -> OrderRequest {
    OrderRequest {
        customer_name: customer.to_string(),
        ordered_at: ordered_at(),
        items: (0..item_count)
            .map(|n| ItemRequest {
                line_item_id: 0,
                item_code: format!("{}-{}", customer, n),
                description: format!("item {} of {}", n, customer),
                quantity: u64::from(n) + 1,
            })
            .collect(),
    }
}
