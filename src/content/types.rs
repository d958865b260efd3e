//! Content wire types
//!
//! Every entity serializes with camelCase JSON, both on the HTTP API and in
//! the durable snapshots. Image fields are opaque references: an external
//! URL or an embedded `data:` URI. Nothing here validates them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Collection keys
// =============================================================================

/// Namespace prefix for every durable key owned by the store
pub const KEY_PREFIX: &str = "museion.";

/// One durable key per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKey {
    PageAssets,
    Exhibitions,
    Artworks,
    Collectables,
    Events,
    GalleryTrack,
    Bookings,
    ShopOrders,
    Newsletter,
    StaffMode,
    Reviews,
}

impl CollectionKey {
    /// Every key, in bootstrap order
    pub const ALL: [CollectionKey; 11] = [
        Self::PageAssets,
        Self::Exhibitions,
        Self::Artworks,
        Self::Collectables,
        Self::Events,
        Self::GalleryTrack,
        Self::Bookings,
        Self::ShopOrders,
        Self::Newsletter,
        Self::StaffMode,
        Self::Reviews,
    ];

    /// Short name used in URLs and on the CLI
    pub fn name(&self) -> &'static str {
        match self {
            Self::PageAssets => "page_assets",
            Self::Exhibitions => "exhibitions",
            Self::Artworks => "artworks",
            Self::Collectables => "collectables",
            Self::Events => "events",
            Self::GalleryTrack => "gallery_track",
            Self::Bookings => "bookings",
            Self::ShopOrders => "shop_orders",
            Self::Newsletter => "newsletter",
            Self::StaffMode => "staff_mode",
            Self::Reviews => "reviews",
        }
    }

    /// Namespaced key in the blob store
    pub fn storage_key(&self) -> String {
        format!("{}{}", KEY_PREFIX, self.name())
    }

    /// Append-only logs keep newest-first order
    pub fn is_log(&self) -> bool {
        matches!(
            self,
            Self::Bookings | Self::ShopOrders | Self::Newsletter | Self::Reviews
        )
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for CollectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| format!("unknown collection: {}", s))
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Entities addressed by a string id unique within their collection
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_identified!(Exhibition, Artwork, MuseumEvent, Collectable, ShopOrder, Booking, Review);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exhibition {
    #[serde(default)]
    pub id: String,
    pub title: String,
    /// Free text, e.g. "Mar 12 – Aug 30, 2026"
    pub date_range: String,
    pub description: String,
    pub image: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Free text so that "c. 1665" survives
    pub year: String,
    pub medium: String,
    pub image: String,
}

/// Programme entry stored under the `events` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuseumEvent {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub image: String,
    pub category: String,
}

/// Shop item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collectable {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Integer currency units
    pub price: u64,
    pub category: String,
    pub image: String,
    pub description: String,
    /// Absent means in stock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

impl Collectable {
    /// Only an explicit `false` disables purchase
    pub fn is_purchasable(&self) -> bool {
        self.in_stock != Some(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Fulfilled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub collectable: Collectable,
    pub quantity: u32,
}

impl OrderItem {
    /// `None` when the line total does not fit in a `u64`
    pub fn line_total(&self) -> Option<u64> {
        self.collectable.price.checked_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopOrder {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    pub items: Vec<OrderItem>,
    pub total_amount: u64,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Ticket counts by class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCounts {
    #[serde(default)]
    pub adult: u32,
    #[serde(default)]
    pub student: u32,
    #[serde(default)]
    pub child: u32,
}

impl TicketCounts {
    pub fn total(&self) -> u32 {
        self.adult.saturating_add(self.student).saturating_add(self.child)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    pub visit_date: NaiveDate,
    pub tickets: TicketCounts,
    pub total_amount: u64,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Visitor review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// 1..=5
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Page assets and gallery
// =============================================================================

/// Page-keyed bag of editable copy and image references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageAssets {
    pub home: HomePageAssets,
    pub about: AboutPageAssets,
    pub visit: VisitPageAssets,
    /// Pages without a typed schema
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomePageAssets {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutPageAssets {
    pub hero_image: String,
    pub history: String,
    pub mission: String,
    pub team: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisitPageAssets {
    pub hours: String,
    pub location: String,
    pub admission: String,
    pub hero_image: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    #[default]
    Left,
    Right,
}

/// Homepage scrolling gallery configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryTrack {
    /// Seconds per full loop
    pub speed: u32,
    pub direction: ScrollDirection,
    pub images: Vec<String>,
}

// =============================================================================
// Image references
// =============================================================================

/// Classification of an opaque image reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Empty,
    /// `data:` URI produced by client-side downscaling
    Embedded,
    External,
}

impl ImageKind {
    pub fn of(reference: &str) -> Self {
        let trimmed = reference.trim_start();
        if trimmed.is_empty() {
            Self::Empty
        } else if trimmed
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
        {
            Self::Embedded
        } else {
            Self::External
        }
    }
}
