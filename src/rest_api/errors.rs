//! # REST API Errors
//!
//! Error taxonomy for the order endpoints and its HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::database::DatabaseError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// Body sent with every 500
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    /// Request body did not decode into the expected shape
    #[error("{0}")]
    BadRequest(String),

    /// No order with the requested identifier
    #[error("Resource not found")]
    NotFound,

    /// Store failure or any other unexpected condition
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound => StatusCode::NOT_FOUND,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DatabaseError> for RestError {
    fn from(err: DatabaseError) -> Self {
        RestError::Internal(err.to_string())
    }
}

/// 400 response body
#[derive(Debug, Serialize)]
pub struct BadRequestResponse {
    pub error: String,
}

/// 500 response body
#[derive(Debug, Serialize)]
pub struct ServerErrorResponse {
    pub errors: &'static str,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            RestError::BadRequest(error) => (status, Json(BadRequestResponse { error })).into_response(),
            RestError::NotFound => (status, Json(json!({ "data": null }))).into_response(),
            RestError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                let body = ServerErrorResponse {
                    errors: INTERNAL_ERROR_MESSAGE,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
