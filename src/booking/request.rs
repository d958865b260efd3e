//! Booking requests and pricing

use crate::config::TicketPrices;
use crate::content::edit::new_id;
use crate::content::types::{Booking, TicketCounts};
use crate::content::ContentStore;
use crate::error::{Error, Result};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

/// Status recorded on every new booking
pub const CONFIRMED: &str = "Confirmed";

/// Upper bound on tickets per booking
pub const MAX_TICKETS: u32 = 50;

/// Total price for `tickets`
pub fn quote(prices: &TicketPrices, tickets: &TicketCounts) -> Result<u64> {
    let line = |price: u64, count: u32| price.checked_mul(u64::from(count));
    line(prices.adult, tickets.adult)
        .zip(line(prices.student, tickets.student))
        .zip(line(prices.child, tickets.child))
        .and_then(|((adult, student), child)| adult.checked_add(student)?.checked_add(child))
        .ok_or_else(|| Error::Validation("ticket total is too large".to_string()))
}

/// Booking request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub customer_name: String,
    pub email: String,
    pub visit_date: NaiveDate,
    pub tickets: TicketCounts,
}

impl BookingRequest {
    /// Validate and price the request
    pub fn into_booking(self, prices: &TicketPrices, today: NaiveDate) -> Result<Booking> {
        let customer_name = self.customer_name.trim();
        let email = self.email.trim();
        if customer_name.is_empty() {
            return Err(Error::Validation("customer name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(Error::Validation("a valid email is required".to_string()));
        }
        let count = self.tickets.total();
        if count == 0 {
            return Err(Error::Validation("at least one ticket is required".to_string()));
        }
        if count > MAX_TICKETS {
            return Err(Error::Validation(format!(
                "at most {} tickets per booking",
                MAX_TICKETS
            )));
        }
        if self.visit_date < today {
            return Err(Error::Validation("visit date is in the past".to_string()));
        }

        Ok(Booking {
            id: new_id("bk"),
            customer_name: customer_name.to_string(),
            email: email.to_string(),
            visit_date: self.visit_date,
            tickets: self.tickets,
            total_amount: quote(prices, &self.tickets)?,
            created_at: Utc::now(),
            status: CONFIRMED.to_string(),
        })
    }
}

/// Price, validate and record a booking
pub fn book_visit(
    store: &ContentStore,
    prices: &TicketPrices,
    request: BookingRequest,
) -> Result<Booking> {
    let booking = request.into_booking(prices, Utc::now().date_naive())?;
    if !store.add_booking(booking.clone()) {
        return Err(Error::Storage("failed to record booking".to_string()));
    }
    tracing::info!(
        "Booking {} for {} ({} tickets)",
        booking.id,
        booking.visit_date,
        booking.tickets.total()
    );
    Ok(booking)
}
