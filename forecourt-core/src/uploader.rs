//! Batch transfer of uploaded files to the object store, registering each
//! stored object as a gallery image. Files succeed or fail independently;
//! one bad file never aborts its siblings.

use std::sync::Arc;

use forecourt_model::NewImage;
use thiserror::Error;
use tracing::{info, warn};

use crate::Result;
use crate::database::ports::GalleryStore;
use crate::storage::ObjectStore;

/// Content types accepted for gallery uploads.
pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp"];

pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_BATCH_FILES: usize = 12;

/// Pre-transfer resource limits, enforced before any bytes move.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_bytes: usize,
    pub max_batch_files: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_batch_files: DEFAULT_MAX_BATCH_FILES,
        }
    }
}

/// One file as received from the operator-facing layer.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Why a single file in a batch was not uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadErrorKind {
    #[error("unsupported content type {0}")]
    UnsupportedType(String),

    #[error("file is {actual} bytes, over the {max} byte limit")]
    TooLarge { actual: usize, max: usize },

    #[error("batch exceeds the {0} file limit")]
    BatchLimitExceeded(usize),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("registration failed: {0}")]
    Register(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub filename: String,
    pub reason: UploadErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub id: i64,
    pub url: String,
}

/// Aggregate outcome of one batch. A partially failed batch is still a
/// successful call; the failures are data, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub successful: Vec<UploadedImage>,
    pub failed: Vec<UploadFailure>,
    pub total_uploaded: usize,
}

#[derive(Clone)]
pub struct MediaUploader {
    gallery: Arc<dyn GalleryStore>,
    objects: Arc<dyn ObjectStore>,
    limits: UploadLimits,
}

impl MediaUploader {
    pub fn new(
        gallery: Arc<dyn GalleryStore>,
        objects: Arc<dyn ObjectStore>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            gallery,
            objects,
            limits,
        }
    }

    /// Processes a batch of files for one listing.
    ///
    /// Each file is validated against the allow-list and size limits before
    /// any transfer, then pushed to the object store and registered with the
    /// gallery. The first image registered into an empty gallery becomes the
    /// primary; nothing else touches the primary flag.
    pub async fn upload_batch(
        &self,
        listing_id: i64,
        files: Vec<UploadFile>,
    ) -> Result<UploadSummary> {
        let mut summary = UploadSummary::default();
        if files.is_empty() {
            return Ok(summary);
        }

        let mut primary_assigned =
            self.gallery.count_images(listing_id).await? > 0;

        for (index, file) in files.into_iter().enumerate() {
            if let Some(reason) = self.pre_validate(index, &file) {
                warn!(filename = %file.filename, %reason, "rejected before transfer");
                summary.failed.push(UploadFailure {
                    filename: file.filename,
                    reason,
                });
                continue;
            }

            let stored = match self
                .objects
                .put(&file.bytes, &file.content_type)
                .await
            {
                Ok(stored) => stored,
                Err(err) => {
                    warn!(filename = %file.filename, error = %err, "transfer failed");
                    summary.failed.push(UploadFailure {
                        filename: file.filename,
                        reason: UploadErrorKind::Transfer(err.to_string()),
                    });
                    continue;
                }
            };

            let record = NewImage {
                url: stored.url.clone(),
                storage_key: stored.key.clone(),
                is_primary: !primary_assigned,
            };
            match self.gallery.register(listing_id, &record).await {
                Ok(id) => {
                    primary_assigned = true;
                    summary.successful.push(UploadedImage {
                        id,
                        url: stored.url,
                    });
                }
                Err(err) => {
                    // The object is already stored with no row pointing at
                    // it; it stays orphaned rather than retried.
                    warn!(
                        filename = %file.filename,
                        key = %stored.key,
                        error = %err,
                        "registration failed, object orphaned"
                    );
                    summary.failed.push(UploadFailure {
                        filename: file.filename,
                        reason: UploadErrorKind::Register(err.to_string()),
                    });
                }
            }
        }

        summary.total_uploaded = summary.successful.len();
        info!(
            listing_id,
            uploaded = summary.total_uploaded,
            failed = summary.failed.len(),
            "processed upload batch"
        );
        Ok(summary)
    }

    fn pre_validate(&self, index: usize, file: &UploadFile) -> Option<UploadErrorKind> {
        if index >= self.limits.max_batch_files {
            return Some(UploadErrorKind::BatchLimitExceeded(
                self.limits.max_batch_files,
            ));
        }
        if !ALLOWED_CONTENT_TYPES.contains(&file.content_type.as_str()) {
            return Some(UploadErrorKind::UnsupportedType(
                file.content_type.clone(),
            ));
        }
        if file.bytes.len() > self.limits.max_file_bytes {
            return Some(UploadErrorKind::TooLarge {
                actual: file.bytes.len(),
                max: self.limits.max_file_bytes,
            });
        }
        None
    }
}
