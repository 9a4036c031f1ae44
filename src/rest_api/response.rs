//! # Response Formatting
//!
//! Successful responses wrap their payload in a `data` envelope.

use serde::Serialize;

/// `{ "data": ... }` envelope
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
