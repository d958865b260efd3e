//! HTTP handlers for the Booking API
//!
//! Provides 3 REST endpoints:
//! - GET    /api/v1/bookings        - booking registry, newest first
//! - POST   /api/v1/bookings        - book a visit
//! - GET    /api/v1/bookings/quote  - price a ticket selection

use crate::booking::request::{book_visit, quote, BookingRequest};
use crate::config::TicketPrices;
use crate::content::types::TicketCounts;
use crate::content::ContentStore;
use crate::error::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub store: Arc<ContentStore>,
    pub prices: TicketPrices,
}

/// Create the booking router
pub fn booking_router(state: BookingState) -> Router {
    Router::new()
        .route("/api/v1/bookings", get(list_bookings).post(create_booking))
        .route("/api/v1/bookings/quote", get(get_quote))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    tickets: TicketCounts,
    prices: TicketPrices,
    total_amount: u64,
}

/// GET /api/v1/bookings
async fn list_bookings(State(state): State<BookingState>) -> impl IntoResponse {
    Json(state.store.bookings())
}

/// POST /api/v1/bookings
async fn create_booking(
    State(state): State<BookingState>,
    Json(request): Json<BookingRequest>,
) -> Result<impl IntoResponse> {
    let prices = state.prices;
    let booking = state
        .store
        .run_blocking(move |store| book_visit(store, &prices, request))
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/v1/bookings/quote?adult=2&student=1&child=0
async fn get_quote(
    State(state): State<BookingState>,
    Query(tickets): Query<TicketCounts>,
) -> Result<impl IntoResponse> {
    Ok(Json(QuoteResponse {
        tickets,
        prices: state.prices,
        total_amount: quote(&state.prices, &tickets)?,
    }))
}
