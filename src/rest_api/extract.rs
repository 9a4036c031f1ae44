//! # Request Body Extraction
//!
//! Decodes JSON bodies into typed request objects before a handler runs.
//! Any failure becomes a 400 carrying the decoder's message. The
//! `Content-Type` header is not consulted.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use super::errors::RestError;

/// JSON body extractor whose rejection is [`RestError::BadRequest`]
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| RestError::BadRequest(rejection.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(ValidatedJson)
            .map_err(|e| RestError::BadRequest(e.to_string()))
    }
}
