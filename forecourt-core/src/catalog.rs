//! The catalog interfaces consumed by the presentation layer: visitor-facing
//! reads and operator-facing writes. Both take their stores as explicit
//! handles so tests can substitute doubles.

use std::sync::Arc;

use forecourt_model::{Listing, ListingForm, ListingImage, SearchFilters};
use serde::Serialize;
use tracing::{info, warn};

use crate::Result;
use crate::database::ports::{GalleryStore, ListingStore};
use crate::query::{CatalogQuery, PAGE_SIZE};
use crate::storage::ObjectStore;
use crate::uploader::{MediaUploader, UploadFile, UploadLimits, UploadSummary};

/// One search hit: the listing plus the URL of its effective primary image
/// (`None` when the gallery is empty; callers substitute a placeholder).
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    #[serde(flatten)]
    pub listing: Listing,
    pub primary_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub items: Vec<ListingSummary>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub images: Vec<ListingImage>,
}

/// Visitor-facing catalog reads.
#[derive(Clone)]
pub struct CatalogReadService {
    listings: Arc<dyn ListingStore>,
    gallery: Arc<dyn GalleryStore>,
}

impl CatalogReadService {
    pub fn new(
        listings: Arc<dyn ListingStore>,
        gallery: Arc<dyn GalleryStore>,
    ) -> Self {
        Self { listings, gallery }
    }

    /// Runs the count and page queries for one filtered page and resolves
    /// each hit's effective primary image. Any store failure surfaces as a
    /// single error; there is no partially filled page.
    pub async fn search(
        &self,
        filters: &SearchFilters,
        page: u32,
    ) -> Result<SearchResults> {
        let query = CatalogQuery::build(filters, page);
        let total_count = self.listings.count(&query).await?;
        let listings = self.listings.search(&query).await?;

        let mut items = Vec::with_capacity(listings.len());
        for listing in listings {
            let primary = self.gallery.effective_primary(listing.id).await?;
            items.push(ListingSummary {
                listing,
                primary_image_url: primary.map(|image| image.url),
            });
        }

        Ok(SearchResults {
            items,
            current_page: query.page,
            total_pages: ((total_count + i64::from(PAGE_SIZE) - 1)
                / i64::from(PAGE_SIZE)) as u32,
            total_count,
        })
    }

    pub async fn get_one(&self, id: i64) -> Result<ListingDetail> {
        let listing = self.listings.get(id).await?;
        let images = self.gallery.list_images(id).await?;
        Ok(ListingDetail { listing, images })
    }
}

/// Operator-facing catalog writes. Authentication and rate limiting happen
/// upstream; this layer assumes the caller is allowed to curate.
#[derive(Clone)]
pub struct CatalogWriteService {
    listings: Arc<dyn ListingStore>,
    gallery: Arc<dyn GalleryStore>,
    objects: Arc<dyn ObjectStore>,
    uploader: MediaUploader,
}

impl CatalogWriteService {
    pub fn new(
        listings: Arc<dyn ListingStore>,
        gallery: Arc<dyn GalleryStore>,
        objects: Arc<dyn ObjectStore>,
        limits: UploadLimits,
    ) -> Self {
        let uploader =
            MediaUploader::new(Arc::clone(&gallery), Arc::clone(&objects), limits);
        Self {
            listings,
            gallery,
            objects,
            uploader,
        }
    }

    /// Validates and persists a new listing, then uploads any attached
    /// files. Upload failures do not undo the listing write; they are
    /// reported in the summary.
    pub async fn create_listing(
        &self,
        form: &ListingForm,
        files: Vec<UploadFile>,
    ) -> Result<(i64, UploadSummary)> {
        let fields = form.validate()?;
        let id = self.listings.insert(&fields).await?;
        info!(id, vin = %fields.vin, "created listing");
        let summary = self.uploader.upload_batch(id, files).await?;
        Ok((id, summary))
    }

    /// Full-record replace of a listing; new files append to the gallery.
    pub async fn update_listing(
        &self,
        id: i64,
        form: &ListingForm,
        files: Vec<UploadFile>,
    ) -> Result<UploadSummary> {
        let fields = form.validate()?;
        self.listings.update(id, &fields).await?;
        self.uploader.upload_batch(id, files).await
    }

    /// Removes a listing, its gallery rows (via store cascade), and the
    /// stored objects behind them. Object deletes that fail are logged and
    /// skipped; the catalog rows are already gone.
    pub async fn delete_listing(&self, id: i64) -> Result<()> {
        let keys = self.gallery.storage_keys_for_listing(id).await?;
        self.listings.delete(id).await?;
        for key in keys {
            if let Err(err) = self.objects.delete_by_key(&key).await {
                warn!(%key, error = %err, "object delete failed for removed listing");
            }
        }
        info!(id, "deleted listing");
        Ok(())
    }

    pub async fn toggle_sold(&self, id: i64) -> Result<()> {
        self.listings.toggle_sold(id).await
    }

    pub async fn set_primary_image(
        &self,
        listing_id: i64,
        image_id: i64,
    ) -> Result<()> {
        self.gallery.set_primary(listing_id, image_id).await
    }

    /// Removes one image row and its stored object. The gallery is left
    /// without a primary if the removed image was it; re-designation is an
    /// explicit operator action.
    pub async fn delete_image(&self, image_id: i64) -> Result<()> {
        let removed = self.gallery.delete_image(image_id).await?;
        if let Err(err) = self.objects.delete_by_key(&removed.storage_key).await {
            warn!(
                key = %removed.storage_key,
                error = %err,
                "image row removed but object delete failed"
            );
        }
        Ok(())
    }
}
