//! Booking module: ticket pricing and visit bookings
//!
//! A booking is priced from the configured [`TicketPrices`] and appended
//! newest-first to the `bookings` log.

pub mod handler;
pub mod request;

pub use crate::config::TicketPrices;
pub use handler::{booking_router, BookingState};
pub use request::{book_visit, quote, BookingRequest};
