//! HTTP handlers for the Shop API
//!
//! Provides 3 REST endpoints:
//! - GET    /api/v1/shop/orders              - order log, newest first
//! - POST   /api/v1/shop/checkout            - place an order
//! - POST   /api/v1/shop/orders/:id/fulfill  - mark an order fulfilled

use crate::content::ContentState;
use crate::error::Result;
use crate::shop::cart::{fulfill_order, place_order, CheckoutRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

/// Create the shop router
pub fn shop_router(state: ContentState) -> Router {
    Router::new()
        .route("/api/v1/shop/orders", get(list_orders))
        .route("/api/v1/shop/checkout", post(checkout))
        .route("/api/v1/shop/orders/:id/fulfill", post(fulfill))
        .with_state(state)
}

/// GET /api/v1/shop/orders
async fn list_orders(State(state): State<ContentState>) -> impl IntoResponse {
    Json(state.store.shop_orders())
}

/// POST /api/v1/shop/checkout
async fn checkout(
    State(state): State<ContentState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse> {
    let order = state
        .store
        .run_blocking(move |store| place_order(store, request))
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/v1/shop/orders/:id/fulfill
async fn fulfill(
    State(state): State<ContentState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let order = state
        .store
        .run_blocking(move |store| fulfill_order(store, &id))
        .await?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::content::ContentStore;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn make_app() -> (Router, ContentState) {
        let store = Arc::new(ContentStore::init(Arc::new(MemoryBlobStore::new())).await);
        let state = ContentState::new(store, "curator");
        (shop_router(state.clone()), state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_creates_pending_order() {
        let (app, state) = make_app().await;
        let body = serde_json::json!({
            "customerName": "Ada",
            "email": "ada@example.org",
            "items": [{"collectableId": "col-1", "quantity": 2}]
        });

        let resp = app
            .oneshot(post_json("/api/v1/shop/checkout", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["totalAmount"], 5000);
        assert_eq!(state.store.shop_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_out_of_stock() {
        let (app, state) = make_app().await;
        let body = serde_json::json!({
            "customerName": "Ada",
            "email": "ada@example.org",
            "items": [{"collectableId": "col-4", "quantity": 1}]
        });

        let resp = app
            .oneshot(post_json("/api/v1/shop/checkout", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(state.store.shop_orders().is_empty());
    }

    #[tokio::test]
    async fn test_fulfill_order() {
        let (app, state) = make_app().await;
        let body = serde_json::json!({
            "customerName": "Ada",
            "email": "ada@example.org",
            "items": [{"collectableId": "col-2", "quantity": 1}]
        });
        let resp = app
            .clone()
            .oneshot(post_json("/api/v1/shop/checkout", body))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_string();

        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/api/v1/shop/orders/{}/fulfill", id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "Fulfilled");

        let resp = app
            .oneshot(post_json(
                "/api/v1/shop/orders/ord-missing/fulfill",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.store.shop_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_empty() {
        let (app, _state) = make_app().await;
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/shop/orders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }
}
