//! orderd - HTTP CRUD service for orders and their line items

pub mod cli;
pub mod database;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod rest_api;
