//! # Order Routes
//!
//! Axum handlers for the five order endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::model::{Order, OrderRequest};

use super::errors::{RestError, RestResult};
use super::extract::ValidatedJson;
use super::response::DataResponse;
use super::store::OrderStore;

/// Order API server state
pub struct OrderServer<S: OrderStore> {
    store: Arc<S>,
}

impl<S: OrderStore + 'static> OrderServer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/orders", get(list_handler::<S>).post(create_handler::<S>))
            .route(
                "/orders/:order_id",
                get(show_handler::<S>)
                    .put(update_handler::<S>)
                    .delete(delete_handler::<S>),
            )
            .with_state(state)
    }
}

/// Shared state type
type ServerState<S> = Arc<OrderServer<S>>;

/// Parse an order id path segment.
///
/// A segment that is not an unsigned integer cannot name a stored order.
fn parse_order_id(raw: &str) -> RestResult<u64> {
    raw.parse().map_err(|_| RestError::NotFound)
}

/// GET /orders
async fn list_handler<S: OrderStore + 'static>(
    State(server): State<ServerState<S>>,
) -> RestResult<Json<DataResponse<Vec<Order>>>> {
    let orders = server.store.list_orders().await?;
    Ok(Json(DataResponse::new(orders)))
}

/// GET /orders/:order_id
async fn show_handler<S: OrderStore + 'static>(
    State(server): State<ServerState<S>>,
    Path(order_id): Path<String>,
) -> RestResult<Json<DataResponse<Order>>> {
    let order_id = parse_order_id(&order_id)?;

    let order = server.store.find_order(order_id).await?.ok_or(RestError::NotFound)?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /orders
async fn create_handler<S: OrderStore + 'static>(
    State(server): State<ServerState<S>>,
    ValidatedJson(request): ValidatedJson<OrderRequest>,
) -> RestResult<(StatusCode, Json<DataResponse<Order>>)> {
    request.validate().map_err(RestError::BadRequest)?;

    let order = server.store.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(order))))
}

/// PUT /orders/:order_id
async fn update_handler<S: OrderStore + 'static>(
    State(server): State<ServerState<S>>,
    Path(order_id): Path<String>,
    ValidatedJson(request): ValidatedJson<OrderRequest>,
) -> RestResult<Json<DataResponse<Order>>> {
    request.validate().map_err(RestError::BadRequest)?;
    let order_id = parse_order_id(&order_id)?;

    let order = server
        .store
        .update_order(order_id, request)
        .await?
        .ok_or(RestError::NotFound)?;
    Ok(Json(DataResponse::new(order)))
}

/// DELETE /orders/:order_id
async fn delete_handler<S: OrderStore + 'static>(
    State(server): State<ServerState<S>>,
    Path(order_id): Path<String>,
) -> RestResult<StatusCode> {
    let order_id = parse_order_id(&order_id)?;

    if server.store.delete_order(order_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(RestError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest_api::store::InMemoryOrderStore;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        OrderServer::new(InMemoryOrderStore::new()).router()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(v) => Body::from(serde_json::to_vec(&v).unwrap()),
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn order_body() -> Value {
        json!({
            "customerName": "Tom Jerry",
            "orderedAt": "2019-11-09T21:21:46Z",
            "items": [
                {"itemCode": "123", "description": "IPhone 10X", "quantity": 1},
                {"itemCode": "456", "description": "Case", "quantity": 2}
            ]
        })
    }

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id("17").unwrap(), 17);
        assert!(matches!(parse_order_id("abc"), Err(RestError::NotFound)));
        assert!(matches!(parse_order_id("-1"), Err(RestError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (status, body) = send(&app(), "GET", "/orders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_create_returns_created() {
        let (status, body) = send(&app(), "POST", "/orders", Some(order_body())).await;
        assert_eq!(status, StatusCode::CREATED);

        let order_id = body["data"]["orderID"].as_u64().unwrap();
        assert!(order_id > 0);
        for item in body["data"]["items"].as_array().unwrap() {
            assert!(item["lineItemID"].as_u64().unwrap() > 0);
            assert_eq!(item["orderID"].as_u64().unwrap(), order_id);
        }
    }

    #[tokio::test]
    async fn test_create_malformed_body() {
        let (status, body) = send(&app(), "POST", "/orders", Some(json!({"customerName": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_show_missing_and_non_numeric() {
        let app = app();
        for uri in ["/orders/1", "/orders/abc"] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, json!({"data": null}));
        }
    }

    #[tokio::test]
    async fn test_update_missing_order() {
        let (status, body) = send(&app(), "PUT", "/orders/9", Some(order_body())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"data": null}));
    }

    #[tokio::test]
    async fn test_update_malformed_body() {
        let app = app();
        send(&app, "POST", "/orders", Some(order_body())).await;

        let (status, _) = send(&app, "PUT", "/orders/1", Some(json!([]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_then_show() {
        let app = app();
        let (_, created) = send(&app, "POST", "/orders", Some(order_body())).await;
        let uri = format!("/orders/{}", created["data"]["orderID"]);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_quantity_beyond_u32() {
        let app = app();
        let mut body = order_body();
        body["items"][0]["quantity"] = json!(5_000_000_000_u64);

        let (status, created) = send(&app, "POST", "/orders", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/orders/{}", created["data"]["orderID"]);
        let (_, shown) = send(&app, "GET", &uri, None).await;
        assert_eq!(shown["data"]["items"][0]["quantity"], 5_000_000_000_u64);
    }

    #[tokio::test]
    async fn test_unstorable_quantity_is_bad_request() {
        let app = app();
        let mut body = order_body();
        body["items"][1]["quantity"] = json!(u64::MAX);

        let (status, response) = send(&app, "POST", "/orders", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().contains("quantity"));

        let (status, _) = send(&app, "PUT", "/orders/1", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = send(&app, "GET", "/orders", None).await;
        assert_eq!(listed, json!({"data": []}));
    }
}
