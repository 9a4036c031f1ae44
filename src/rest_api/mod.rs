//! # Order REST API Module
//!
//! HTTP endpoints for CRUD operations on orders and their line items.

pub mod errors;
pub mod extract;
pub mod postgres;
pub mod response;
pub mod server;
pub mod store;

pub use errors::{RestError, RestResult};
pub use extract::ValidatedJson;
pub use postgres::PostgresOrderStore;
pub use response::DataResponse;
pub use server::OrderServer;
pub use store::{InMemoryOrderStore, OrderStore};
