use async_trait::async_trait;
use forecourt_model::{Listing, ListingFields};
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::ports::ListingStore;
use crate::error::{CatalogError, Result};
use crate::query::{BindValue, CatalogQuery};

#[derive(Clone, Debug)]
pub struct SqliteListingStore {
    pool: SqlitePool,
}

impl SqliteListingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn insert(&self, fields: &ListingFields) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO listings \
             (title, year, make, model, price, mileage, vin, engine, \
              transmission, features, video_url, carfax_url, is_featured, sold) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&fields.title)
        .bind(fields.year)
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(fields.price)
        .bind(fields.mileage)
        .bind(&fields.vin)
        .bind(&fields.engine)
        .bind(&fields.transmission)
        .bind(&fields.features)
        .bind(&fields.video_url)
        .bind(&fields.carfax_url)
        .bind(fields.is_featured)
        .bind(fields.sold)
        .execute(&self.pool)
        .await
        .map_err(CatalogError::from_listing_write)?;

        let id = result.last_insert_rowid();
        debug!(id, vin = %fields.vin, "inserted listing");
        Ok(id)
    }

    async fn update(&self, id: i64, fields: &ListingFields) -> Result<()> {
        let result = sqlx::query(
            "UPDATE listings SET \
             title = ?, year = ?, make = ?, model = ?, price = ?, mileage = ?, \
             vin = ?, engine = ?, transmission = ?, features = ?, \
             video_url = ?, carfax_url = ?, is_featured = ?, sold = ? \
             WHERE id = ?",
        )
        .bind(&fields.title)
        .bind(fields.year)
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(fields.price)
        .bind(fields.mileage)
        .bind(&fields.vin)
        .bind(&fields.engine)
        .bind(&fields.transmission)
        .bind(&fields.features)
        .bind(&fields.video_url)
        .bind(&fields.carfax_url)
        .bind(fields.is_featured)
        .bind(fields.sold)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(CatalogError::from_listing_write)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("listing {id}")));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Images go with the listing via ON DELETE CASCADE.
        sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, "deleted listing");
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Listing> {
        let row: Option<ListingRow> =
            sqlx::query_as("SELECT * FROM listings WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Listing::from)
            .ok_or_else(|| CatalogError::NotFound(format!("listing {id}")))
    }

    async fn toggle_sold(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE listings SET sold = NOT sold WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("listing {id}")));
        }
        Ok(())
    }

    async fn search(&self, query: &CatalogQuery) -> Result<Vec<Listing>> {
        let sql = query.page_sql();
        let mut fetch = sqlx::query_as::<_, ListingRow>(&sql);
        for param in query.params() {
            fetch = match param {
                BindValue::Text(text) => fetch.bind(text.as_str()),
                BindValue::Int(value) => fetch.bind(*value),
            };
        }
        let rows = fetch
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn count(&self, query: &CatalogQuery) -> Result<i64> {
        let sql = query.count_sql();
        let mut count = sqlx::query_scalar::<_, i64>(&sql);
        for param in query.params() {
            count = match param {
                BindValue::Text(text) => count.bind(text.as_str()),
                BindValue::Int(value) => count.bind(*value),
            };
        }
        Ok(count.fetch_one(&self.pool).await?)
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    year: i64,
    make: String,
    model: String,
    price: i64,
    mileage: i64,
    vin: String,
    engine: Option<String>,
    transmission: Option<String>,
    features: Option<String>,
    video_url: Option<String>,
    carfax_url: String,
    is_featured: bool,
    sold: bool,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Listing {
            id: row.id,
            title: row.title,
            year: row.year,
            make: row.make,
            model: row.model,
            price: row.price,
            mileage: row.mileage,
            vin: row.vin,
            engine: row.engine,
            transmission: row.transmission,
            features: row.features,
            video_url: row.video_url,
            carfax_url: row.carfax_url,
            is_featured: row.is_featured,
            sold: row.sold,
        }
    }
}
