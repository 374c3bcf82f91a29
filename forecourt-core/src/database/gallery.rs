use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forecourt_model::{ListingImage, NewImage};
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::ports::GalleryStore;
use crate::error::{CatalogError, Result};

/// Column list shared by every gallery read so rows decode uniformly.
const IMAGE_COLUMNS: &str =
    "id, listing_id, image_url, storage_key, display_order, is_primary, created_at";

#[derive(Clone, Debug)]
pub struct SqliteGalleryStore {
    pool: SqlitePool,
}

impl SqliteGalleryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryStore for SqliteGalleryStore {
    async fn list_images(&self, listing_id: i64) -> Result<Vec<ListingImage>> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM listing_images WHERE listing_id = ? \
             ORDER BY display_order ASC, created_at ASC, id ASC"
        );
        let rows: Vec<ImageRow> = sqlx::query_as(&sql)
            .bind(listing_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ListingImage::from).collect())
    }

    async fn effective_primary(
        &self,
        listing_id: i64,
    ) -> Result<Option<ListingImage>> {
        // Ordering by is_primary first collapses the fallback ladder into a
        // single query: flagged primary, else lowest-order image, else none.
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM listing_images WHERE listing_id = ? \
             ORDER BY is_primary DESC, display_order ASC, created_at ASC, id ASC \
             LIMIT 1"
        );
        let row: Option<ImageRow> = sqlx::query_as(&sql)
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ListingImage::from))
    }

    async fn register(&self, listing_id: i64, image: &NewImage) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let next_order: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(display_order) + 1, 0) FROM listing_images \
             WHERE listing_id = ?",
        )
        .bind(listing_id)
        .fetch_one(&mut *tx)
        .await?;

        let created_at: DateTime<Utc> = Utc::now();
        let result = sqlx::query(
            "INSERT INTO listing_images \
             (listing_id, image_url, storage_key, display_order, is_primary, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(listing_id)
        .bind(&image.url)
        .bind(&image.storage_key)
        .bind(next_order)
        .bind(image.is_primary)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(ref db) = err
                && db.is_foreign_key_violation()
            {
                return CatalogError::NotFound(format!("listing {listing_id}"));
            }
            CatalogError::Store(err)
        })?;

        let id = result.last_insert_rowid();
        tx.commit().await?;
        debug!(id, listing_id, order = next_order, "registered gallery image");
        Ok(id)
    }

    async fn count_images(&self, listing_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listing_images WHERE listing_id = ?",
        )
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn set_primary(&self, listing_id: i64, image_id: i64) -> Result<()> {
        // Clear-then-set commits as one transaction; a failed set rolls the
        // clear back, so the gallery never loses its primary to a bad id.
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE listing_images SET is_primary = 0 WHERE listing_id = ?")
            .bind(listing_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE listing_images SET is_primary = 1 \
             WHERE id = ? AND listing_id = ?",
        )
        .bind(image_id)
        .bind(listing_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!(
                "image {image_id} in listing {listing_id}"
            )));
        }

        tx.commit().await?;
        debug!(listing_id, image_id, "designated primary image");
        Ok(())
    }

    async fn delete_image(&self, image_id: i64) -> Result<ListingImage> {
        let sql = format!(
            "DELETE FROM listing_images WHERE id = ? RETURNING {IMAGE_COLUMNS}"
        );
        let row: Option<ImageRow> = sqlx::query_as(&sql)
            .bind(image_id)
            .fetch_optional(&self.pool)
            .await?;
        let removed = row
            .map(ListingImage::from)
            .ok_or_else(|| CatalogError::NotFound(format!("image {image_id}")))?;
        debug!(image_id, listing_id = removed.listing_id, "deleted gallery image");
        Ok(removed)
    }

    async fn storage_keys_for_listing(
        &self,
        listing_id: i64,
    ) -> Result<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar(
            "SELECT storage_key FROM listing_images WHERE listing_id = ?",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(keys)
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: i64,
    listing_id: i64,
    image_url: String,
    storage_key: String,
    display_order: i64,
    is_primary: bool,
    created_at: DateTime<Utc>,
}

impl From<ImageRow> for ListingImage {
    fn from(row: ImageRow) -> Self {
        ListingImage {
            id: row.id,
            listing_id: row.listing_id,
            url: row.image_url,
            storage_key: row.storage_key,
            display_order: row.display_order,
            is_primary: row.is_primary,
            created_at: row.created_at,
        }
    }
}
