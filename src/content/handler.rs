//! HTTP handlers for the Content API
//!
//! Provides 12 REST endpoints:
//! - GET    /api/v1/content/usage         - advisory storage usage
//! - POST   /api/v1/content/reset         - factory reset (requires confirm)
//! - GET    /api/v1/content/:collection   - read a whole collection
//! - PUT    /api/v1/content/:collection   - replace a whole collection
//! - POST   /api/v1/content/:collection/items      - create or update one item
//! - DELETE /api/v1/content/:collection/items/:id  - delete one item
//! - GET    /api/v1/staff/mode            - staff mode flag
//! - PUT    /api/v1/staff/mode            - set staff mode flag
//! - POST   /api/v1/staff/login           - password check, enables staff mode
//! - POST   /api/v1/newsletter            - subscribe an email
//! - GET    /api/v1/reviews               - reviews, newest first
//! - POST   /api/v1/reviews               - add a review

use crate::content::edit::{self, new_id};
use crate::content::store::{
    ContentStore, Records, ARTWORKS, COLLECTABLES, EVENTS, EXHIBITIONS,
};
use crate::content::types::{CollectionKey, Identified, Review};
use crate::error::{ApiError, Error, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for content handlers
#[derive(Clone)]
pub struct ContentState {
    pub store: Arc<ContentStore>,
    /// Staff password; gates edit affordances only
    pub admin_password: Arc<str>,
}

impl ContentState {
    pub fn new(store: Arc<ContentStore>, admin_password: &str) -> Self {
        Self {
            store,
            admin_password: Arc::from(admin_password),
        }
    }
}

/// Create the content router with all REST endpoints
pub fn content_router(state: ContentState) -> Router {
    Router::new()
        .route("/api/v1/content/usage", get(get_usage))
        .route("/api/v1/content/reset", post(reset_content))
        .route(
            "/api/v1/content/:collection",
            get(get_collection).put(put_collection),
        )
        .route("/api/v1/content/:collection/items", post(upsert_item))
        .route("/api/v1/content/:collection/items/:id", delete(delete_item))
        .route("/api/v1/staff/mode", get(get_staff_mode).put(put_staff_mode))
        .route("/api/v1/staff/login", post(staff_login))
        .route("/api/v1/newsletter", post(subscribe))
        .route("/api/v1/reviews", get(list_reviews).post(add_review))
        .with_state(state)
}

/// Request body for the factory reset
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Staff mode flag payload
#[derive(Debug, Serialize, Deserialize)]
pub struct StaffMode {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub name: String,
    pub rating: u8,
    pub comment: String,
}

fn parse_collection(name: &str) -> Result<CollectionKey> {
    name.parse().map_err(Error::NotFound)
}

fn saved(ok: bool, what: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Storage(format!("failed to save {}", what)))
    }
}

// =============================================================================
// Collections
// =============================================================================

/// GET /api/v1/content/:collection
async fn get_collection(
    State(state): State<ContentState>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse> {
    let key = parse_collection(&collection)?;
    Ok(Json(state.store.get_value(key)))
}

/// PUT /api/v1/content/:collection
async fn put_collection(
    State(state): State<ContentState>,
    Path(collection): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse> {
    let key = parse_collection(&collection)?;
    if key.is_log() {
        tracing::info!("Replacing the whole {} log", key);
    }
    let stored = state
        .store
        .run_blocking(move |store| {
            saved(store.save_value(key, body)?, key.name())?;
            Ok(store.get_value(key))
        })
        .await?;
    Ok(Json(stored))
}

fn upsert_into<T>(
    store: &ContentStore,
    records: &Records<T>,
    body: serde_json::Value,
) -> Result<serde_json::Value>
where
    T: Identified + Clone + Serialize + DeserializeOwned,
{
    let item: T = serde_json::from_value(body)
        .map_err(|e| Error::Validation(format!("invalid item: {}", e)))?;
    let item = store.update_records(records, |items| {
        let (next, item) = edit::upsert(items, item, records.prefix());
        *items = next;
        Ok(item)
    })?;
    Ok(serde_json::to_value(item)?)
}

fn remove_from<T>(store: &ContentStore, records: &Records<T>, id: &str) -> Result<()>
where
    T: Identified + Clone + Serialize,
{
    store.update_records(records, |items| {
        *items = edit::remove(items, id)
            .ok_or_else(|| Error::NotFound(format!("item '{}'", id)))?;
        Ok(())
    })
}

fn not_editable(key: CollectionKey) -> Error {
    Error::Validation(format!("{} does not hold editable items", key))
}

/// POST /api/v1/content/:collection/items
///
/// An empty or missing id creates a new item; a known id replaces it.
async fn upsert_item(
    State(state): State<ContentState>,
    Path(collection): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse> {
    let key = parse_collection(&collection)?;
    let item = state
        .store
        .run_blocking(move |store| match key {
            CollectionKey::Exhibitions => upsert_into(store, &EXHIBITIONS, body),
            CollectionKey::Artworks => upsert_into(store, &ARTWORKS, body),
            CollectionKey::Collectables => upsert_into(store, &COLLECTABLES, body),
            CollectionKey::Events => upsert_into(store, &EVENTS, body),
            other => Err(not_editable(other)),
        })
        .await?;
    Ok(Json(item))
}

/// DELETE /api/v1/content/:collection/items/:id
async fn delete_item(
    State(state): State<ContentState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let key = parse_collection(&collection)?;
    state
        .store
        .run_blocking(move |store| match key {
            CollectionKey::Exhibitions => remove_from(store, &EXHIBITIONS, &id),
            CollectionKey::Artworks => remove_from(store, &ARTWORKS, &id),
            CollectionKey::Collectables => remove_from(store, &COLLECTABLES, &id),
            CollectionKey::Events => remove_from(store, &EVENTS, &id),
            other => Err(not_editable(other)),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/content/usage
async fn get_usage(State(state): State<ContentState>) -> impl IntoResponse {
    Json(state.store.storage_usage())
}

/// POST /api/v1/content/reset
async fn reset_content(
    State(state): State<ContentState>,
    Json(request): Json<ResetRequest>,
) -> impl IntoResponse {
    if !request.confirm {
        return (
            StatusCode::BAD_REQUEST,
            Json(
                serde_json::to_value(ApiError::bad_request(
                    "Reset deletes all content; send {\"confirm\": true}",
                ))
                .unwrap_or_default(),
            ),
        );
    }

    match state.store.run_blocking(|store| store.reset_all()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "reset": true })),
        ),
        Err(err) => (
            err.status_code(),
            Json(serde_json::to_value(ApiError::from(&err)).unwrap_or_default()),
        ),
    }
}

// =============================================================================
// Staff mode
// =============================================================================

/// GET /api/v1/staff/mode
async fn get_staff_mode(State(state): State<ContentState>) -> impl IntoResponse {
    Json(StaffMode {
        enabled: state.store.staff_mode(),
    })
}

/// PUT /api/v1/staff/mode
async fn put_staff_mode(
    State(state): State<ContentState>,
    Json(request): Json<StaffMode>,
) -> Result<impl IntoResponse> {
    let enabled = request.enabled;
    state
        .store
        .run_blocking(move |store| saved(store.set_staff_mode(enabled), "staff mode"))
        .await?;
    Ok(Json(request))
}

/// POST /api/v1/staff/login
async fn staff_login(
    State(state): State<ContentState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    if request.password != *state.admin_password {
        tracing::info!("Rejected staff login");
        return Ok((
            StatusCode::FORBIDDEN,
            Json(
                serde_json::to_value(ApiError::forbidden("Incorrect password"))
                    .unwrap_or_default(),
            ),
        ));
    }

    state
        .store
        .run_blocking(|store| saved(store.set_staff_mode(true), "staff mode"))
        .await?;
    Ok((StatusCode::OK, Json(serde_json::json!({ "enabled": true }))))
}

// =============================================================================
// Newsletter and reviews
// =============================================================================

/// POST /api/v1/newsletter
async fn subscribe(
    State(state): State<ContentState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<impl IntoResponse> {
    if !request.email.contains('@') {
        return Err(Error::Validation("a valid email is required".to_string()));
    }
    let email = request.email;
    state
        .store
        .run_blocking(move |store| saved(store.subscribe_newsletter(&email), "newsletter"))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/reviews
async fn list_reviews(State(state): State<ContentState>) -> impl IntoResponse {
    Json(state.store.reviews())
}

/// POST /api/v1/reviews
async fn add_review(
    State(state): State<ContentState>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    if !(1..=5).contains(&request.rating) {
        return Err(Error::Validation("rating must be between 1 and 5".to_string()));
    }
    if request.name.trim().is_empty() {
        return Err(Error::Validation("name is required".to_string()));
    }

    let review = Review {
        id: new_id("rev"),
        name: request.name.trim().to_string(),
        rating: request.rating,
        comment: request.comment,
        created_at: chrono::Utc::now(),
    };
    let record = review.clone();
    state
        .store
        .run_blocking(move |store| saved(store.add_review(record), "review"))
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::content::defaults;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn make_app() -> (Router, ContentState) {
        make_app_with(Arc::new(MemoryBlobStore::new())).await
    }

    async fn make_app_with(blobs: Arc<MemoryBlobStore>) -> (Router, ContentState) {
        let store = Arc::new(ContentStore::init(blobs).await);
        let state = ContentState::new(store, "curator");
        (content_router(state.clone()), state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_get_default_exhibitions() {
        let (app, _state) = make_app().await;
        let resp = app
            .oneshot(get_request("/api/v1/content/exhibitions"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[0]["id"], "exh-1");
        assert!(json[0]["dateRange"].is_string());
    }

    #[tokio::test]
    async fn test_upsert_and_delete_item() {
        let (app, state) = make_app().await;
        let draft = serde_json::json!({
            "title": "Lapis and Gold",
            "dateRange": "Spring season",
            "description": "Jewellery from the royal tombs.",
            "image": "data:image/jpeg;base64,/9j/",
            "category": "Special"
        });

        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/content/exhibitions/items", draft))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let created = body_json(resp).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("exh-"));
        assert_eq!(state.store.exhibitions().len(), 5);

        let mut edited = created.clone();
        edited["title"] = serde_json::json!("Lapis, Gold and Carnelian");
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/content/exhibitions/items", edited))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let exhibitions = state.store.exhibitions();
        assert_eq!(exhibitions.len(), 5);
        assert_eq!(exhibitions[4].id, id);
        assert_eq!(exhibitions[4].title, "Lapis, Gold and Carnelian");

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/content/exhibitions/items/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.store.exhibitions(), defaults::exhibitions());

        let resp = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/content/exhibitions/items/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_item_creates_are_all_kept() {
        let (app, state) = make_app().await;
        let mut tasks = Vec::new();
        for i in 0..24 {
            let app = app.clone();
            tasks.push(tokio::spawn(async move {
                let draft = serde_json::json!({
                    "title": format!("Pop-up {}", i),
                    "dateRange": "",
                    "description": "",
                    "image": "",
                    "category": "Pop-up"
                });
                app.oneshot(json_request("POST", "/api/v1/content/exhibitions/items", draft))
                    .await
                    .unwrap()
                    .status()
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::OK);
        }

        let exhibitions = state.store.exhibitions();
        assert_eq!(exhibitions.len(), 4 + 24);
        let mut ids: Vec<&str> = exhibitions.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 28);
    }

    #[tokio::test]
    async fn test_put_collection_assigns_ids_and_rejects_duplicates() {
        let (app, state) = make_app().await;
        let event = serde_json::json!({
            "title": "Late opening",
            "date": "Fridays",
            "time": "18:00",
            "description": "",
            "image": "",
            "category": "Evening"
        });

        let resp = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/content/events",
                serde_json::json!([event.clone()]),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json[0]["id"].as_str().unwrap().starts_with("evt-"));

        let mut twin = event;
        twin["id"] = serde_json::json!("evt-9");
        let resp = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/content/events",
                serde_json::json!([twin.clone(), twin]),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.events().len(), 1);
    }

    #[tokio::test]
    async fn test_item_edits_rejected_for_logs() {
        let (app, _state) = make_app().await;
        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/v1/content/bookings/items",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_collection() {
        let (app, _state) = make_app().await;
        let resp = app
            .oneshot(get_request("/api/v1/content/tickets"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_collection_replaces_whole_value() {
        let (app, state) = make_app().await;
        let resp = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/content/exhibitions",
                serde_json::json!([]),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.store.exhibitions().is_empty());

        let resp = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/content/exhibitions",
                serde_json::json!({"not": "a list"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_collection_reports_storage_failure() {
        let (app, state) = make_app_with(Arc::new(MemoryBlobStore::with_quota(64))).await;
        let body = serde_json::to_value(defaults::artworks()).unwrap();
        let resp = app
            .oneshot(json_request("PUT", "/api/v1/content/artworks", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INSUFFICIENT_STORAGE);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "STORAGE_WRITE_FAILED");
        assert_eq!(state.store.artworks(), defaults::artworks());
    }

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let (app, state) = make_app().await;
        assert!(state.store.save_exhibitions(Vec::new()));

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/content/reset",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.store.exhibitions().is_empty());

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/v1/content/reset",
                serde_json::json!({"confirm": true}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.store.exhibitions().len(), 4);
    }

    #[tokio::test]
    async fn test_usage() {
        let (app, _state) = make_app().await;
        let resp = app
            .oneshot(get_request("/api/v1/content/usage"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json["bytes"].as_u64().unwrap() > 0);
        assert!(json["megabytes"].is_string());
        assert!(json["percentUsed"].is_number());
    }

    #[tokio::test]
    async fn test_staff_login() {
        let (app, state) = make_app().await;

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/staff/login",
                serde_json::json!({"password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(!state.store.staff_mode());

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/staff/login",
                serde_json::json!({"password": "curator"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.store.staff_mode());

        let resp = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/staff/mode",
                serde_json::json!({"enabled": false}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!state.store.staff_mode());
    }

    #[tokio::test]
    async fn test_subscribe_twice_keeps_one_entry() {
        let (app, state) = make_app().await;
        for _ in 0..2 {
            let resp = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/v1/newsletter",
                    serde_json::json!({"email": "fan@example.org"}),
                ))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        }
        assert_eq!(state.store.newsletter_emails(), vec!["fan@example.org"]);

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/v1/newsletter",
                serde_json::json!({"email": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reviews() {
        let (app, state) = make_app().await;
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/reviews",
                serde_json::json!({"name": "Sam", "rating": 5, "comment": "Loved it"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert!(json["id"].as_str().unwrap().starts_with("rev-"));

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/reviews",
                serde_json::json!({"name": "Sam", "rating": 9, "comment": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = app.oneshot(get_request("/api/v1/reviews")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(state.store.reviews().len(), 1);
    }
}
