//! Content store: in-memory cache mirrored to a durable blob store
//!
//! Every collection lives under one namespaced key (see
//! [`CollectionKey::storage_key`]). Reads are served from the cache without
//! I/O. Writes replace a whole collection: the snapshot is written first and
//! the cache is only updated when the durable write succeeded, so callers
//! never observe an update that would be lost on restart.
//!
//! Writes are last-write-wins per collection. One operator editing from
//! one process is the supported model; two processes sharing a data
//! directory will overwrite each other's collections.

use crate::blob::BlobStore;
use crate::content::defaults;
use crate::content::edit;
use crate::content::types::*;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Advisory quota matching a browser storage area
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Everything the store serves, one field per collection key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentCache {
    page_assets: PageAssets,
    exhibitions: Vec<Exhibition>,
    artworks: Vec<Artwork>,
    collectables: Vec<Collectable>,
    events: Vec<MuseumEvent>,
    gallery_track: GalleryTrack,
    bookings: Vec<Booking>,
    shop_orders: Vec<ShopOrder>,
    newsletter: Vec<String>,
    staff_mode: bool,
    reviews: Vec<Review>,
}

impl ContentCache {
    fn defaults() -> Self {
        Self {
            page_assets: defaults::page_assets(),
            exhibitions: defaults::exhibitions(),
            artworks: defaults::artworks(),
            collectables: defaults::collectables(),
            events: defaults::events(),
            gallery_track: defaults::gallery_track(),
            bookings: Vec::new(),
            shop_orders: Vec::new(),
            newsletter: Vec::new(),
            staff_mode: false,
            reviews: Vec::new(),
        }
    }

    /// Read every key, falling back to the seed per key
    fn load(blobs: &dyn BlobStore) -> Self {
        Self {
            page_assets: load_key(blobs, CollectionKey::PageAssets, defaults::page_assets),
            exhibitions: load_key(blobs, CollectionKey::Exhibitions, defaults::exhibitions),
            artworks: load_key(blobs, CollectionKey::Artworks, defaults::artworks),
            collectables: load_key(blobs, CollectionKey::Collectables, defaults::collectables),
            events: load_key(blobs, CollectionKey::Events, defaults::events),
            gallery_track: load_key(blobs, CollectionKey::GalleryTrack, defaults::gallery_track),
            bookings: load_key(blobs, CollectionKey::Bookings, Vec::new),
            shop_orders: load_key(blobs, CollectionKey::ShopOrders, Vec::new),
            newsletter: load_key(blobs, CollectionKey::Newsletter, Vec::new),
            staff_mode: load_key(blobs, CollectionKey::StaffMode, || false),
            reviews: load_key(blobs, CollectionKey::Reviews, Vec::new),
        }
    }

    fn image_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = Vec::new();
        refs.extend(self.exhibitions.iter().map(|e| e.image.as_str()));
        refs.extend(self.artworks.iter().map(|a| a.image.as_str()));
        refs.extend(self.events.iter().map(|e| e.image.as_str()));
        refs.extend(self.collectables.iter().map(|c| c.image.as_str()));
        refs.extend(
            self.shop_orders
                .iter()
                .flat_map(|o| o.items.iter().map(|i| i.collectable.image.as_str())),
        );
        refs.extend(self.gallery_track.images.iter().map(String::as_str));
        refs.push(&self.page_assets.home.hero_image);
        refs.push(&self.page_assets.about.hero_image);
        refs.push(&self.page_assets.visit.hero_image);
        refs.extend(self.page_assets.about.team.iter().map(|m| m.image.as_str()));
        refs
    }
}

/// Typed handle on a collection of identified records.
///
/// Used with [`ContentStore::update_records`] for read-modify-write edits
/// that must not race with appends.
pub struct Records<T> {
    key: CollectionKey,
    prefix: &'static str,
    slot: fn(&mut ContentCache) -> &mut Vec<T>,
}

impl<T> Records<T> {
    pub fn key(&self) -> CollectionKey {
        self.key
    }

    /// Id prefix for new records, e.g. `exh`
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }
}

fn exhibitions_slot(cache: &mut ContentCache) -> &mut Vec<Exhibition> {
    &mut cache.exhibitions
}

fn artworks_slot(cache: &mut ContentCache) -> &mut Vec<Artwork> {
    &mut cache.artworks
}

fn collectables_slot(cache: &mut ContentCache) -> &mut Vec<Collectable> {
    &mut cache.collectables
}

fn events_slot(cache: &mut ContentCache) -> &mut Vec<MuseumEvent> {
    &mut cache.events
}

fn bookings_slot(cache: &mut ContentCache) -> &mut Vec<Booking> {
    &mut cache.bookings
}

fn shop_orders_slot(cache: &mut ContentCache) -> &mut Vec<ShopOrder> {
    &mut cache.shop_orders
}

fn reviews_slot(cache: &mut ContentCache) -> &mut Vec<Review> {
    &mut cache.reviews
}

pub const EXHIBITIONS: Records<Exhibition> = Records {
    key: CollectionKey::Exhibitions,
    prefix: "exh",
    slot: exhibitions_slot,
};

pub const ARTWORKS: Records<Artwork> = Records {
    key: CollectionKey::Artworks,
    prefix: "art",
    slot: artworks_slot,
};

pub const COLLECTABLES: Records<Collectable> = Records {
    key: CollectionKey::Collectables,
    prefix: "col",
    slot: collectables_slot,
};

pub const EVENTS: Records<MuseumEvent> = Records {
    key: CollectionKey::Events,
    prefix: "evt",
    slot: events_slot,
};

pub const BOOKINGS: Records<Booking> = Records {
    key: CollectionKey::Bookings,
    prefix: "bk",
    slot: bookings_slot,
};

pub const SHOP_ORDERS: Records<ShopOrder> = Records {
    key: CollectionKey::ShopOrders,
    prefix: "ord",
    slot: shop_orders_slot,
};

pub const REVIEWS: Records<Review> = Records {
    key: CollectionKey::Reviews,
    prefix: "rev",
    slot: reviews_slot,
};

fn load_key<T: DeserializeOwned>(
    blobs: &dyn BlobStore,
    key: CollectionKey,
    seed: impl FnOnce() -> T,
) -> T {
    let storage_key = key.storage_key();
    match blobs.get(&storage_key) {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Corrupt snapshot {}, using defaults: {}", storage_key, e);
                seed()
            }
        },
        Ok(None) => seed(),
        Err(e) => {
            tracing::warn!("Failed to read {}, using defaults: {}", storage_key, e);
            seed()
        }
    }
}

/// Advisory storage usage derived from the serialized cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub bytes: u64,
    /// Two decimals, e.g. "0.04"
    pub megabytes: String,
    pub quota_bytes: u64,
    pub percent_used: f64,
    /// Bytes held in `data:` image references
    pub embedded_image_bytes: u64,
}

/// Format a byte count as megabytes with two decimals
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0))
}

/// Single source of truth for museum content and transactional records
pub struct ContentStore {
    blobs: Arc<dyn BlobStore>,
    cache: RwLock<ContentCache>,
    quota_bytes: u64,
}

impl ContentStore {
    /// Bootstrap the cache from durable snapshots.
    ///
    /// Never fails: unreadable keys fall back to their seed, and if the
    /// loading task itself dies the whole cache starts from defaults.
    pub async fn init(blobs: Arc<dyn BlobStore>) -> Self {
        let loader = blobs.clone();
        let cache = match tokio::task::spawn_blocking(move || ContentCache::load(loader.as_ref()))
            .await
        {
            Ok(cache) => cache,
            Err(e) => {
                tracing::error!("Content bootstrap failed, serving defaults: {}", e);
                ContentCache::defaults()
            }
        };

        tracing::debug!(
            "Content store ready: {} exhibitions, {} artworks, {} collectables",
            cache.exhibitions.len(),
            cache.artworks.len(),
            cache.collectables.len()
        );

        Self {
            blobs,
            cache: RwLock::new(cache),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    /// Set the advisory quota reported by [`storage_usage`](Self::storage_usage)
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, ContentCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContentCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn page_assets(&self) -> PageAssets {
        self.read().page_assets.clone()
    }

    pub fn exhibitions(&self) -> Vec<Exhibition> {
        self.read().exhibitions.clone()
    }

    pub fn artworks(&self) -> Vec<Artwork> {
        self.read().artworks.clone()
    }

    pub fn collectables(&self) -> Vec<Collectable> {
        self.read().collectables.clone()
    }

    pub fn events(&self) -> Vec<MuseumEvent> {
        self.read().events.clone()
    }

    pub fn gallery_track(&self) -> GalleryTrack {
        self.read().gallery_track.clone()
    }

    /// Newest first
    pub fn bookings(&self) -> Vec<Booking> {
        self.read().bookings.clone()
    }

    /// Newest first
    pub fn shop_orders(&self) -> Vec<ShopOrder> {
        self.read().shop_orders.clone()
    }

    /// Newest first
    pub fn newsletter_emails(&self) -> Vec<String> {
        self.read().newsletter.clone()
    }

    /// Newest first
    pub fn reviews(&self) -> Vec<Review> {
        self.read().reviews.clone()
    }

    pub fn staff_mode(&self) -> bool {
        self.read().staff_mode
    }

    /// Collectable by id
    pub fn collectable(&self, id: &str) -> Option<Collectable> {
        self.read().collectables.iter().find(|c| c.id == id).cloned()
    }

    /// Any collection as JSON
    pub fn get_value(&self, key: CollectionKey) -> serde_json::Value {
        let cache = self.read();
        let value = match key {
            CollectionKey::PageAssets => serde_json::to_value(&cache.page_assets),
            CollectionKey::Exhibitions => serde_json::to_value(&cache.exhibitions),
            CollectionKey::Artworks => serde_json::to_value(&cache.artworks),
            CollectionKey::Collectables => serde_json::to_value(&cache.collectables),
            CollectionKey::Events => serde_json::to_value(&cache.events),
            CollectionKey::GalleryTrack => serde_json::to_value(&cache.gallery_track),
            CollectionKey::Bookings => serde_json::to_value(&cache.bookings),
            CollectionKey::ShopOrders => serde_json::to_value(&cache.shop_orders),
            CollectionKey::Newsletter => serde_json::to_value(&cache.newsletter),
            CollectionKey::StaffMode => serde_json::to_value(cache.staff_mode),
            CollectionKey::Reviews => serde_json::to_value(&cache.reviews),
        };
        value.unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize {}: {}", key, e);
            serde_json::Value::Null
        })
    }

    // =========================================================================
    // Whole-collection writes
    // =========================================================================

    fn persist<T: Serialize>(&self, key: CollectionKey, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.blobs.set(&key.storage_key(), &bytes)
    }

    fn replace<T: Serialize>(
        &self,
        key: CollectionKey,
        value: T,
        slot: fn(&mut ContentCache) -> &mut T,
    ) -> bool {
        let mut cache = self.write();
        match self.persist(key, &value) {
            Ok(()) => {
                *slot(&mut cache) = value;
                tracing::debug!("Saved {}", key);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", key, e);
                false
            }
        }
    }

    pub fn save_page_assets(&self, data: PageAssets) -> bool {
        self.replace(CollectionKey::PageAssets, data, |c| &mut c.page_assets)
    }

    pub fn save_exhibitions(&self, data: Vec<Exhibition>) -> bool {
        self.replace(CollectionKey::Exhibitions, data, |c| &mut c.exhibitions)
    }

    pub fn save_artworks(&self, data: Vec<Artwork>) -> bool {
        self.replace(CollectionKey::Artworks, data, |c| &mut c.artworks)
    }

    pub fn save_collectables(&self, data: Vec<Collectable>) -> bool {
        self.replace(CollectionKey::Collectables, data, |c| &mut c.collectables)
    }

    pub fn save_events(&self, data: Vec<MuseumEvent>) -> bool {
        self.replace(CollectionKey::Events, data, |c| &mut c.events)
    }

    pub fn save_gallery_track(&self, data: GalleryTrack) -> bool {
        self.replace(CollectionKey::GalleryTrack, data, |c| &mut c.gallery_track)
    }

    pub fn save_bookings(&self, data: Vec<Booking>) -> bool {
        self.replace(CollectionKey::Bookings, data, |c| &mut c.bookings)
    }

    pub fn save_shop_orders(&self, data: Vec<ShopOrder>) -> bool {
        self.replace(CollectionKey::ShopOrders, data, |c| &mut c.shop_orders)
    }

    pub fn save_newsletter_emails(&self, data: Vec<String>) -> bool {
        self.replace(CollectionKey::Newsletter, data, |c| &mut c.newsletter)
    }

    pub fn save_reviews(&self, data: Vec<Review>) -> bool {
        self.replace(CollectionKey::Reviews, data, |c| &mut c.reviews)
    }

    pub fn set_staff_mode(&self, enabled: bool) -> bool {
        self.replace(CollectionKey::StaffMode, enabled, |c| &mut c.staff_mode)
    }

    /// Replace any collection from JSON.
    ///
    /// Records without an id get a fresh one. A payload of the wrong shape
    /// or with duplicate ids is a validation error; a durable write failure
    /// is `Ok(false)`.
    pub fn save_value(&self, key: CollectionKey, value: serde_json::Value) -> Result<bool> {
        fn parse<T: DeserializeOwned>(key: CollectionKey, value: serde_json::Value) -> Result<T> {
            serde_json::from_value(value)
                .map_err(|e| Error::Validation(format!("invalid {} payload: {}", key, e)))
        }

        fn parse_records<T: Identified + DeserializeOwned>(
            records: &Records<T>,
            value: serde_json::Value,
        ) -> Result<Vec<T>> {
            let mut items: Vec<T> = parse(records.key, value)?;
            edit::assign_ids(&mut items, records.prefix)?;
            Ok(items)
        }

        Ok(match key {
            CollectionKey::PageAssets => self.save_page_assets(parse(key, value)?),
            CollectionKey::Exhibitions => {
                self.save_exhibitions(parse_records(&EXHIBITIONS, value)?)
            }
            CollectionKey::Artworks => self.save_artworks(parse_records(&ARTWORKS, value)?),
            CollectionKey::Collectables => {
                self.save_collectables(parse_records(&COLLECTABLES, value)?)
            }
            CollectionKey::Events => self.save_events(parse_records(&EVENTS, value)?),
            CollectionKey::GalleryTrack => self.save_gallery_track(parse(key, value)?),
            CollectionKey::Bookings => self.save_bookings(parse_records(&BOOKINGS, value)?),
            CollectionKey::ShopOrders => {
                self.save_shop_orders(parse_records(&SHOP_ORDERS, value)?)
            }
            CollectionKey::Newsletter => self.save_newsletter_emails(parse(key, value)?),
            CollectionKey::StaffMode => self.set_staff_mode(parse(key, value)?),
            CollectionKey::Reviews => self.save_reviews(parse_records(&REVIEWS, value)?),
        })
    }

    /// Read-modify-write one collection under the cache write lock.
    ///
    /// `f` edits a copy; the copy is persisted and only then swapped into
    /// the cache. An error from `f` or from the durable write leaves both
    /// untouched.
    pub fn update_records<T, R>(
        &self,
        records: &Records<T>,
        f: impl FnOnce(&mut Vec<T>) -> Result<R>,
    ) -> Result<R>
    where
        T: Serialize + Clone,
    {
        let mut cache = self.write();
        let mut next = (records.slot)(&mut *cache).clone();
        let out = f(&mut next)?;

        if let Err(e) = self.persist(records.key, &next) {
            tracing::warn!("Failed to update {}: {}", records.key, e);
            return Err(e);
        }
        *(records.slot)(&mut *cache) = next;
        Ok(out)
    }

    /// Run a store operation on the blocking pool.
    ///
    /// Writes hold the cache lock across durable I/O, so async callers
    /// route them through here instead of the runtime threads.
    pub async fn run_blocking<T, F>(self: &Arc<Self>, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ContentStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| Error::Storage(format!("store task failed: {}", e)))?
    }

    // =========================================================================
    // Log appends (newest first)
    // =========================================================================

    fn prepend_locked<T: Serialize + Clone>(
        &self,
        cache: &mut ContentCache,
        key: CollectionKey,
        item: T,
        slot: fn(&mut ContentCache) -> &mut Vec<T>,
    ) -> bool {
        let current = slot(cache);
        let mut next = Vec::with_capacity(current.len() + 1);
        next.push(item);
        next.extend(current.iter().cloned());

        match self.persist(key, &next) {
            Ok(()) => {
                *slot(cache) = next;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to append to {}: {}", key, e);
                false
            }
        }
    }

    pub fn add_booking(&self, booking: Booking) -> bool {
        let mut cache = self.write();
        self.prepend_locked(&mut cache, CollectionKey::Bookings, booking, |c| {
            &mut c.bookings
        })
    }

    pub fn save_shop_order(&self, order: ShopOrder) -> bool {
        let mut cache = self.write();
        self.prepend_locked(&mut cache, CollectionKey::ShopOrders, order, |c| {
            &mut c.shop_orders
        })
    }

    pub fn add_review(&self, review: Review) -> bool {
        let mut cache = self.write();
        self.prepend_locked(&mut cache, CollectionKey::Reviews, review, |c| {
            &mut c.reviews
        })
    }

    /// Add an email to the newsletter list.
    ///
    /// Emails are compared trimmed and case-insensitively; subscribing an
    /// address already on the list succeeds without writing.
    pub fn subscribe_newsletter(&self, email: &str) -> bool {
        let email = email.trim();
        if email.is_empty() {
            return false;
        }

        let mut cache = self.write();
        if cache
            .newsletter
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(email))
        {
            tracing::debug!("Newsletter already has {}", email);
            return true;
        }
        self.prepend_locked(
            &mut cache,
            CollectionKey::Newsletter,
            email.to_string(),
            |c| &mut c.newsletter,
        )
    }

    // =========================================================================
    // Usage, reload and reset
    // =========================================================================

    /// Size of the serialized cache against the advisory quota.
    ///
    /// Not a reading of the durable medium; see
    /// [`BlobStore::size_estimate`] for that.
    pub fn storage_usage(&self) -> StorageUsage {
        let cache = self.read();
        let bytes = match serde_json::to_vec(&*cache) {
            Ok(buf) => buf.len() as u64,
            Err(e) => {
                tracing::warn!("Failed to serialize cache for usage estimate: {}", e);
                0
            }
        };
        let embedded_image_bytes = cache
            .image_refs()
            .into_iter()
            .filter(|r| ImageKind::of(r) == ImageKind::Embedded)
            .map(|r| r.len() as u64)
            .sum();
        let percent_used = if self.quota_bytes == 0 {
            0.0
        } else {
            bytes as f64 * 100.0 / self.quota_bytes as f64
        };

        StorageUsage {
            bytes,
            megabytes: format_megabytes(bytes),
            quota_bytes: self.quota_bytes,
            percent_used,
            embedded_image_bytes,
        }
    }

    /// Megabytes used by the serialized cache, two decimals
    pub fn storage_usage_estimate(&self) -> String {
        self.storage_usage().megabytes
    }

    /// Re-run bootstrap against the durable store
    pub fn reload(&self) {
        let mut cache = self.write();
        *cache = ContentCache::load(self.blobs.as_ref());
    }

    /// Delete every key owned by the store and re-bootstrap to defaults.
    ///
    /// Irreversible. Callers must obtain explicit confirmation first.
    pub fn reset_all(&self) -> Result<()> {
        let mut cache = self.write();

        let mut owned: Vec<String> = CollectionKey::ALL.iter().map(|k| k.storage_key()).collect();
        match self.blobs.keys() {
            Ok(keys) => owned.extend(keys.into_iter().filter(|k| k.starts_with(KEY_PREFIX))),
            Err(e) => tracing::warn!("Failed to list keys during reset: {}", e),
        }
        owned.sort();
        owned.dedup();

        let mut failed = Vec::new();
        for key in &owned {
            if let Err(e) = self.blobs.delete(key) {
                tracing::warn!("Failed to delete {}: {}", key, e);
                failed.push(key.clone());
            }
        }

        *cache = ContentCache::load(self.blobs.as_ref());
        tracing::info!("Content store reset ({} keys removed)", owned.len() - failed.len());

        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::Storage(format!(
                "failed to delete: {}",
                failed.join(", ")
            )))
        }
    }
}
