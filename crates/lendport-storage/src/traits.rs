//! Storage transfer trait
//!
//! Defines the capability the upload coordinator uses to move bytes to a
//! presigned URL. Chunking or multipart semantics, if a backend needs them,
//! stay inside the implementation.

use async_trait::async_trait;
use lendport_core::ArtifactFile;
use std::sync::Arc;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage rejected upload with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Writes a payload to a presigned URL
#[async_trait]
pub trait StorageTransfer: Send + Sync {
    /// Perform a single authorized write of `file` to `upload_url`.
    ///
    /// Resolves only when the storage backend accepted the write.
    async fn put(&self, upload_url: &str, file: &ArtifactFile) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: StorageTransfer + ?Sized> StorageTransfer for Arc<T> {
    async fn put(&self, upload_url: &str, file: &ArtifactFile) -> anyhow::Result<()> {
        (**self).put(upload_url, file).await
    }
}
