//! Image storage capability and the bundled filesystem backend

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during image storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to download image from {url}: {message}")]
    Download { url: String, message: String },

    #[error("Failed to write image {key}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },
}

/// Result type for image storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Capability contract for durable image storage
///
/// `store` persists the bytes under `key` and returns a retrievable
/// reference that stands in for the raw bytes in emitted records.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, bytes: &[u8], key: &str) -> StoreResult<String>;
}

/// Downloads thumbnail bytes, bounded by the client's configured timeout
pub async fn fetch_image_bytes(client: &reqwest::Client, url: &str) -> StoreResult<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| StoreError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let bytes = response.bytes().await.map_err(|e| StoreError::Download {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(bytes.to_vec())
}

/// Filesystem-backed image store
///
/// The returned reference is the path of the stored file, which plays the
/// role a durable URL would with a remote blob store.
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(&self, bytes: &[u8], key: &str) -> StoreResult<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })?;

        let path = self.dir.join(key);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })?;

        tracing::info!(%key, bytes = bytes.len(), "image stored");

        // Prefer the canonical path so the reference stays valid from any
        // working directory
        let reference = tokio::fs::canonicalize(&path).await.unwrap_or(path);
        Ok(reference.display().to_string())
    }
}
