use forecourt_model::ValidationError;
use thiserror::Error;

use crate::storage::ObjectStoreError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// VIN uniqueness violation, distinguished from generic store failures
    /// so callers can render a targeted message.
    #[error("a listing with this VIN already exists")]
    DuplicateVin,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),
}

impl CatalogError {
    /// Maps a store error from a listing write, surfacing VIN uniqueness
    /// violations as [`CatalogError::DuplicateVin`].
    pub(crate) fn from_listing_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err
            && db.is_unique_violation()
        {
            return CatalogError::DuplicateVin;
        }
        CatalogError::Store(err)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
