//! Durable key-value blob storage
//!
//! The content store persists one snapshot per collection key through the
//! [`BlobStore`] trait. Two backends ship with Museion:
//!
//! - [`FileBlobStore`]: one `<key>.json` file per key in a data directory
//! - [`MemoryBlobStore`]: process-local map with an optional byte quota
//!
//! All operations are synchronous. Callers own error handling; the store
//! never retries.

mod file;
mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use crate::error::Result;

/// Durable key-value blob store
pub trait BlobStore: Send + Sync {
    /// Read the bytes stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the bytes stored under `key`
    fn set(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// All keys currently present
    fn keys(&self) -> Result<Vec<String>>;

    /// Total bytes held by the medium
    fn size_estimate(&self) -> Result<u64>;
}
