//! Store ports. Services hold these as `Arc<dyn …>` so tests can substitute
//! doubles for either store.

use async_trait::async_trait;
use forecourt_model::{Listing, ListingFields, ListingImage, NewImage};

use crate::Result;
use crate::query::CatalogQuery;

#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Inserts a validated listing; fails with
    /// [`crate::CatalogError::DuplicateVin`] when the VIN is taken.
    async fn insert(&self, fields: &ListingFields) -> Result<i64>;

    /// Full-record replace of an existing listing.
    async fn update(&self, id: i64, fields: &ListingFields) -> Result<()>;

    /// Removes a listing; owned images go with it via cascade. Deleting a
    /// listing that is already gone is not an error.
    async fn delete(&self, id: i64) -> Result<()>;

    async fn get(&self, id: i64) -> Result<Listing>;

    async fn toggle_sold(&self, id: i64) -> Result<()>;

    /// Executes the built page-fetch query with bound parameters only.
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<Listing>>;

    /// Executes the matching count query over the same predicate.
    async fn count(&self, query: &CatalogQuery) -> Result<i64>;
}

#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Gallery in display order (display_order, then creation time).
    async fn list_images(&self, listing_id: i64) -> Result<Vec<ListingImage>>;

    /// The image shown as the listing's thumbnail: the flagged primary if
    /// one exists, otherwise the first image in gallery order, otherwise
    /// `None` (callers substitute a placeholder).
    async fn effective_primary(
        &self,
        listing_id: i64,
    ) -> Result<Option<ListingImage>>;

    /// Persists a new gallery entry at the end of the display order.
    async fn register(&self, listing_id: i64, image: &NewImage) -> Result<i64>;

    async fn count_images(&self, listing_id: i64) -> Result<i64>;

    /// Re-designates the primary image. Clear-all-then-set-one runs inside
    /// one transaction, so readers never observe two primaries or a dropped
    /// primary. Idempotent.
    async fn set_primary(&self, listing_id: i64, image_id: i64) -> Result<()>;

    /// Removes the row and returns it so the caller can release the stored
    /// object. Does not promote a replacement primary.
    async fn delete_image(&self, image_id: i64) -> Result<ListingImage>;

    /// Storage keys of every image owned by the listing, for object cleanup
    /// alongside a listing cascade delete.
    async fn storage_keys_for_listing(
        &self,
        listing_id: i64,
    ) -> Result<Vec<String>>;
}
