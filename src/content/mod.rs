//! Content module: the museum's single source of truth
//!
//! Holds exhibitions, artworks, events, shop items, page copy and the
//! transactional logs (bookings, shop orders, newsletter, reviews) in an
//! in-memory cache mirrored to a [`BlobStore`](crate::blob::BlobStore).
//! Ships with a built-in seed dataset served until the first write.

pub mod defaults;
pub mod edit;
pub mod handler;
pub mod store;
pub mod types;

pub use handler::{content_router, ContentState};
pub use store::{ContentStore, StorageUsage};
