//! In-memory blob store with an optional byte quota

use super::BlobStore;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Map-backed blob store
///
/// With a quota set, a `set` that would push the total size past the quota
/// fails with [`Error::QuotaExceeded`], the same way a browser storage area
/// refuses writes once full.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
    quota: Option<u64>,
}

impl MemoryBlobStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store refusing writes beyond `quota` total bytes
    pub fn with_quota(quota: u64) -> Self {
        Self {
            blobs: RwLock::new(BTreeMap::new()),
            quota: Some(quota),
        }
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut blobs = self.blobs.write().unwrap_or_else(|e| e.into_inner());
        if let Some(quota) = self.quota {
            let others: u64 = blobs
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| (k.len() + v.len()) as u64)
                .sum();
            let needed = others + (key.len() + bytes.len()) as u64;
            if needed > quota {
                return Err(Error::QuotaExceeded { needed, quota });
            }
        }
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.blobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.keys().cloned().collect())
    }

    fn size_estimate(&self) -> Result<u64> {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.iter().map(|(k, v)| (k.len() + v.len()) as u64).sum())
    }
}
