//! Binary object storage port and the local-filesystem adapter.
//!
//! The catalog never owns image bytes; it references them by an opaque key
//! returned from `put` and releases them with `delete_by_key`.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful `put`: where the object is publicly served from,
/// and the key that deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> std::result::Result<StoredObject, ObjectStoreError>;

    async fn delete_by_key(
        &self,
        key: &str,
    ) -> std::result::Result<(), ObjectStoreError>;
}

/// Object store backed by a local directory, serving objects from a
/// configured public base URL. Stands in for a hosted blob service in
/// single-node deployments and exercises the port for real in tests.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let mut public_base_url: String = public_base_url.into();
        while public_base_url.ends_with('/') {
            public_base_url.pop();
        }
        Self {
            root: root.into(),
            public_base_url,
        }
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Keys are single path components minted by `put`; anything else cannot
/// name an object we created.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains(['/', '\\'])
        && key != "."
        && key != ".."
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> std::result::Result<StoredObject, ObjectStoreError> {
        let ext = extension_for(content_type).ok_or_else(|| {
            ObjectStoreError::UnsupportedContentType(content_type.to_string())
        })?;
        let key = format!("{}.{}", Uuid::new_v4(), ext);

        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(&key), bytes).await?;
        debug!(%key, byte_len = bytes.len(), "stored object");

        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, key),
            key,
        })
    }

    async fn delete_by_key(
        &self,
        key: &str,
    ) -> std::result::Result<(), ObjectStoreError> {
        if !is_valid_key(key) {
            return Err(ObjectStoreError::NotFound(key.to_string()));
        }
        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => {
                debug!(%key, "deleted object");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectStoreError::NotFound(key.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
