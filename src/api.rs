//! Unified API router for Museion
//!
//! Merges all module routers into a single axum `Router` with CORS and
//! request tracing.
//!
//! ## Endpoint Map
//!
//! | Prefix                    | Module  | Description                          |
//! |---------------------------|---------|--------------------------------------|
//! | `/health`                 | api     | Liveness check                       |
//! | `/api/v1/content/*`       | content | Collections, usage, factory reset    |
//! | `/api/v1/staff/*`         | content | Staff mode and login                 |
//! | `/api/v1/newsletter`      | content | Newsletter sign-up                   |
//! | `/api/v1/reviews`         | content | Visitor reviews                      |
//! | `/api/v1/shop/*`          | shop    | Checkout, orders, fulfilment         |
//! | `/api/v1/bookings/*`      | booking | Ticket quotes and visit bookings     |
//! | `/api/v1/curator/*`       | curator | AI curator chat                      |

use crate::booking::{booking_router, BookingState};
use crate::content::{content_router, ContentState};
use crate::curator::{curator_router, CuratorState};
use crate::shop::shop_router;
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Museion HTTP application
///
/// Merges all module routers, adds CORS and tracing middleware, and returns
/// a single `Router` ready to be served by `axum::serve`.
pub fn build_app(
    content_state: ContentState,
    booking_state: BookingState,
    curator_state: CuratorState,
    cors_origins: &[String],
) -> Router {
    let cors = build_cors(cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .merge(content_router(content_state.clone()))
        .merge(shop_router(content_state))
        .merge(booking_router(booking_state))
        .merge(curator_router(curator_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::config::{CuratorConfig, TicketPrices};
    use crate::content::ContentStore;
    use crate::curator::CuratorClient;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn make_app() -> Router {
        let store = Arc::new(ContentStore::init(Arc::new(MemoryBlobStore::new())).await);
        let curator = CuratorClient::new(CuratorConfig {
            enabled: false,
            ..Default::default()
        });
        build_app(
            ContentState::new(store.clone(), "curator"),
            BookingState {
                store,
                prices: TicketPrices::default(),
            },
            CuratorState {
                client: Arc::new(curator),
            },
            &[],
        )
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_check() {
        let resp = health_check().await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_merged_routes_respond() {
        let app = make_app().await;
        assert_eq!(get_status(app.clone(), "/health").await, StatusCode::OK);
        assert_eq!(
            get_status(app.clone(), "/api/v1/content/exhibitions").await,
            StatusCode::OK
        );
        assert_eq!(
            get_status(app.clone(), "/api/v1/shop/orders").await,
            StatusCode::OK
        );
        assert_eq!(
            get_status(app.clone(), "/api/v1/bookings/quote?adult=1").await,
            StatusCode::OK
        );
        assert_eq!(get_status(app, "/api/v1/nowhere").await, StatusCode::NOT_FOUND);
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/content/exhibitions")
            .header("origin", origin)
            .header("access-control-request-method", "PUT")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_any_origin_when_unconfigured() {
        let app = make_app().await;
        let resp = app.oneshot(preflight("https://anywhere.example")).await.unwrap();
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_cors_restricted_to_configured_origins() {
        let app = Router::new()
            .route("/api/v1/content/exhibitions", get(|| async { "ok" }))
            .layer(build_cors(&[
                "http://localhost:5173".to_string(),
                "https://museum.example.org".to_string(),
            ]));

        let resp = app
            .clone()
            .oneshot(preflight("https://museum.example.org"))
            .await
            .unwrap();
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("https://museum.example.org")
        );

        let resp = app.oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
