//! Shop module: cart, checkout and order fulfilment
//!
//! Orders are appended newest-first to the `shop_orders` log. Payment is
//! not processed; a placed order starts `Pending` until staff mark it
//! `Fulfilled`.

pub mod cart;
pub mod handler;

pub use cart::{fulfill_order, place_order, Cart, CheckoutRequest};
pub use handler::shop_router;
