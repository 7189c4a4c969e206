//! Storage abstraction trait
//!
//! Defines the `Storage` trait that all backends implement, plus the error
//! type shared by every storage operation.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use playbox_core::StorageBackend;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked object content as it arrives from the backend.
pub type ObjectStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An object fetched from the store: the byte stream plus whatever metadata
/// the backend reports. The payload is never buffered whole.
pub struct StoredObject {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub stream: ObjectStream,
}

impl std::fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("stream", &"<stream>")
            .finish()
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3-compatible, local filesystem) implement this.
/// Handlers work against the trait so tests can run on the local backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a fully-buffered payload to a storage key.
    async fn put(&self, storage_key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Upload from a reader without buffering the whole payload.
    /// The reader is consumed until EOF.
    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<()>;

    /// Fetch an object as a stream together with its reported metadata.
    async fn get_stream(&self, storage_key: &str) -> StorageResult<StoredObject>;

    /// Check if an object exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type.
    fn backend_type(&self) -> StorageBackend;
}
