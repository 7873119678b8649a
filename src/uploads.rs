//! Blob storage for uploaded images.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Invalid blob name: {0}")]
    InvalidName(String),
    #[error("Blob not found: {0}")]
    NotFound(String),
    #[error("Blob storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque storage for uploaded files. Callers hand over bytes and get back a
/// generated name, which is the only handle to the stored content.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` and returns the generated blob name, ending in `.{extension}`.
    async fn save(&self, bytes: &[u8], extension: &str) -> Result<String, BlobError>;

    /// Resolves a previously saved blob to a readable path.
    async fn open(&self, name: &str) -> Result<PathBuf, BlobError>;
}

/// Blobs stored as flat files in one directory.
#[derive(Debug, Clone)]
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

// Names are generated by `save`, so anything with separators or traversal is
// not ours.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn save(&self, bytes: &[u8], extension: &str) -> Result<String, BlobError> {
        if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(BlobError::InvalidName(extension.to_string()));
        }

        tokio::fs::create_dir_all(&self.root).await?;
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.root.join(&name), bytes).await?;

        tracing::debug!(blob = %name, size = bytes.len(), "Blob saved");
        Ok(name)
    }

    async fn open(&self, name: &str) -> Result<PathBuf, BlobError> {
        if !is_safe_name(name) {
            return Err(BlobError::InvalidName(name.to_string()));
        }

        let path = self.root.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(BlobError::NotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
