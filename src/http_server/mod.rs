//! # HTTP Server Module
//!
//! Combines the order API and a health check into one Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/orders` - List and create orders
//! - `/orders/:order_id` - Show, update and delete an order

pub mod config;
pub mod health_routes;
pub mod request_id;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
