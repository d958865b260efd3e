//! Museion - Content Store for a Museum Website
//!
//! Museion keeps every piece of site content (page copy, exhibitions,
//! artworks, collectables, events, the scrolling gallery track) together
//! with the visitor-generated logs (bookings, shop orders, newsletter
//! sign-ups, reviews) in one in-memory cache mirrored to a durable
//! key-value blob store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      HTTP API (axum)                      │
//! │   content · staff · shop · bookings · curator · health    │
//! └──────────────┬─────────────────────────────┬─────────────┘
//!                │                             │
//! ┌──────────────▼──────────────┐   ┌──────────▼──────────┐
//! │        ContentStore          │   │    CuratorClient     │
//! │  cache (RwLock) + seed data  │   │  hosted model, or    │
//! │  persist first, then cache   │   │  a static apology    │
//! └──────────────┬──────────────┘   └─────────────────────┘
//!                │ museion.<collection>
//! ┌──────────────▼──────────────┐
//! │     BlobStore (file / mem)   │
//! └─────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`content`]: the content store, entity types and seed data
//! - [`blob`]: durable key-value backends
//! - [`shop`]: cart, checkout and order fulfilment
//! - [`booking`]: ticket quotes and visit bookings
//! - [`curator`]: AI curator client
//! - [`api`]: merged HTTP router
//! - [`config`]: configuration management

pub mod api;
pub mod blob;
pub mod booking;
pub mod config;
pub mod content;
pub mod curator;
pub mod error;
pub mod shop;

pub use config::MuseionConfig;
pub use content::ContentStore;
pub use error::{Error, Result};
