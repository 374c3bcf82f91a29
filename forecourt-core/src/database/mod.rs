//! SQLite persistence for listings and their image galleries.

pub mod gallery;
pub mod listings;
pub mod ports;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::Result;

pub use gallery::SqliteGalleryStore;
pub use listings::SqliteListingStore;
pub use ports::{GalleryStore, ListingStore};

const CREATE_LISTINGS: &str = "\
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    year INTEGER NOT NULL,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    price INTEGER NOT NULL,
    mileage INTEGER NOT NULL,
    vin TEXT NOT NULL UNIQUE,
    engine TEXT,
    transmission TEXT,
    features TEXT,
    video_url TEXT,
    carfax_url TEXT NOT NULL,
    is_featured INTEGER NOT NULL DEFAULT 0,
    sold INTEGER NOT NULL DEFAULT 0
)";

const CREATE_LISTING_IMAGES: &str = "\
CREATE TABLE IF NOT EXISTS listing_images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    listing_id INTEGER NOT NULL,
    image_url TEXT NOT NULL,
    storage_key TEXT NOT NULL,
    display_order INTEGER NOT NULL DEFAULT 0,
    is_primary INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    FOREIGN KEY (listing_id) REFERENCES listings(id) ON DELETE CASCADE
)";

const CREATE_LISTING_IMAGES_INDEX: &str = "\
CREATE INDEX IF NOT EXISTS idx_listing_images_listing_id
    ON listing_images(listing_id)";

/// Opens a pool against `database_url`, creating the file if missing.
///
/// Foreign keys are enabled per connection; the image cascade depends on it.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Creates the catalog relations if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_LISTINGS).execute(pool).await?;
    sqlx::query(CREATE_LISTING_IMAGES).execute(pool).await?;
    sqlx::query(CREATE_LISTING_IMAGES_INDEX).execute(pool).await?;
    info!("catalog schema ready");
    Ok(())
}
