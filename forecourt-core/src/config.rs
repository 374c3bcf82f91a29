use std::env;
use std::path::PathBuf;

use serde::Deserialize;

use crate::uploader::{DEFAULT_MAX_BATCH_FILES, DEFAULT_MAX_FILE_BYTES, UploadLimits};

/// Process configuration, read from the environment with sensible defaults
/// for single-node deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// SQLite connection URL for the catalog store.
    pub database_url: String,

    /// Directory the filesystem object store writes into.
    pub storage_root: PathBuf,

    /// Public base URL stored objects are served from.
    pub public_base_url: String,

    pub max_upload_bytes: usize,
    pub max_batch_files: usize,
}

impl CatalogConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://forecourt.db?mode=rwc".to_string()),

            storage_root: env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "./media".to_string())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "/media".to_string()),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_MAX_FILE_BYTES),
            max_batch_files: env::var("MAX_BATCH_FILES")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_MAX_BATCH_FILES),
        })
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_bytes: self.max_upload_bytes,
            max_batch_files: self.max_batch_files,
        }
    }

    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.storage_root)?;
        Ok(())
    }
}
