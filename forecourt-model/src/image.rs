use chrono::{DateTime, Utc};
use serde::Serialize;

/// One photo belonging to exactly one listing.
///
/// The record references the externally stored bytes by `storage_key`; the
/// bytes themselves never pass through the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingImage {
    pub id: i64,
    pub listing_id: i64,
    /// Public display URL served by the object store.
    pub url: String,
    /// Opaque key used to delete the underlying object.
    pub storage_key: String,
    /// Sort key only; not guaranteed contiguous.
    pub display_order: i64,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// A gallery entry that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub url: String,
    pub storage_key: String,
    pub is_primary: bool,
}
