//! HTTP handler for the AI Curator
//!
//! - POST /api/v1/curator/chat - one question, one reply

use crate::curator::client::CuratorClient;
use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for curator handlers
#[derive(Clone)]
pub struct CuratorState {
    pub client: Arc<CuratorClient>,
}

/// Create the curator router
pub fn curator_router(state: CuratorState) -> Router {
    Router::new()
        .route("/api/v1/curator/chat", post(chat))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

/// POST /api/v1/curator/chat
///
/// Always answers 200; failures surface as the apology text.
async fn chat(
    State(state): State<CuratorState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let reply = state.client.ask(&request.message).await;
    Json(ChatResponse { reply })
}
