//! Shared fixtures for the catalog integration tests: an in-memory SQLite
//! pool with the schema applied, listing fixtures, and test doubles for the
//! object store and gallery port.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use forecourt_core::Result;
use forecourt_core::database::{self, GalleryStore, SqliteGalleryStore};
use forecourt_core::error::CatalogError;
use forecourt_core::storage::{ObjectStore, ObjectStoreError, StoredObject};
use forecourt_model::{ListingFields, ListingImage, NewImage};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory database");
    database::init_schema(&pool).await.expect("apply schema");
    pool
}

pub fn fields(vin: &str) -> ListingFields {
    ListingFields {
        title: format!("Test vehicle {vin}"),
        year: 2018,
        make: "Honda".into(),
        model: "Civic".into(),
        price: 12500,
        mileage: 40000,
        vin: vin.into(),
        engine: None,
        transmission: None,
        features: None,
        video_url: None,
        carfax_url: format!("https://carfax.example/{vin}"),
        is_featured: false,
        sold: false,
    }
}

pub fn new_image(tag: &str) -> NewImage {
    NewImage {
        url: format!("https://cdn.test/{tag}.jpg"),
        storage_key: format!("{tag}.jpg"),
        is_primary: false,
    }
}

/// Object store double that keeps everything in memory and records the
/// operations issued against it.
#[derive(Debug, Default)]
pub struct RecordingObjectStore {
    counter: AtomicU64,
    pub stored: Mutex<Vec<StoredObject>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_puts: AtomicBool,
}

impl RecordingObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    pub fn stored_keys(&self) -> Vec<String> {
        self.stored
            .lock()
            .expect("stored lock")
            .iter()
            .map(|object| object.key.clone())
            .collect()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().expect("deleted lock").clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put(
        &self,
        _bytes: &[u8],
        _content_type: &str,
    ) -> std::result::Result<StoredObject, ObjectStoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Io(std::io::Error::other(
                "injected transfer failure",
            )));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let object = StoredObject {
            url: format!("https://cdn.test/obj-{n}.jpg"),
            key: format!("obj-{n}.jpg"),
        };
        self.stored.lock().expect("stored lock").push(object.clone());
        Ok(object)
    }

    async fn delete_by_key(
        &self,
        key: &str,
    ) -> std::result::Result<(), ObjectStoreError> {
        self.deleted.lock().expect("deleted lock").push(key.to_string());
        Ok(())
    }
}

/// Gallery double that fails the next `register` call and then behaves like
/// the real store, for exercising the orphaned-object path.
pub struct FailNextRegisterGallery {
    inner: SqliteGalleryStore,
    fail_next: AtomicBool,
}

impl FailNextRegisterGallery {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqliteGalleryStore::new(pool),
            fail_next: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl GalleryStore for FailNextRegisterGallery {
    async fn list_images(&self, listing_id: i64) -> Result<Vec<ListingImage>> {
        self.inner.list_images(listing_id).await
    }

    async fn effective_primary(
        &self,
        listing_id: i64,
    ) -> Result<Option<ListingImage>> {
        self.inner.effective_primary(listing_id).await
    }

    async fn register(&self, listing_id: i64, image: &NewImage) -> Result<i64> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CatalogError::Store(sqlx::Error::PoolClosed));
        }
        self.inner.register(listing_id, image).await
    }

    async fn count_images(&self, listing_id: i64) -> Result<i64> {
        self.inner.count_images(listing_id).await
    }

    async fn set_primary(&self, listing_id: i64, image_id: i64) -> Result<()> {
        self.inner.set_primary(listing_id, image_id).await
    }

    async fn delete_image(&self, image_id: i64) -> Result<ListingImage> {
        self.inner.delete_image(image_id).await
    }

    async fn storage_keys_for_listing(
        &self,
        listing_id: i64,
    ) -> Result<Vec<String>> {
        self.inner.storage_keys_for_listing(listing_id).await
    }
}
