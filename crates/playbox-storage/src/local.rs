use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use playbox_core::media_type;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Local filesystem storage implementation, used for development and tests.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// The local backend stores no metadata; the content type is derived from
    /// the key's extension.
    fn derive_content_type(storage_key: &str) -> Option<String> {
        let ext = media_type::extension_of(storage_key);
        if let Some(known) = media_type::from_extension(ext) {
            return Some(known.to_string());
        }
        match media_type::upload_content_type(ext) {
            media_type::OCTET_STREAM => None,
            known => Some(known.to_string()),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        storage_key: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;

        tracing::debug!(key = %storage_key, path = %path.display(), "Local upload successful");
        Ok(())
    }

    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await?;
        let written = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            key = %storage_key,
            size_bytes = written,
            content_type = %content_type,
            "Local stream upload successful"
        );
        Ok(())
    }

    async fn get_stream(&self, storage_key: &str) -> StorageResult<StoredObject> {
        let path = self.key_to_path(storage_key)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(storage_key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let content_length = file.metadata().await.ok().map(|m| m.len());
        let stream = ReaderStream::new(file)
            .map(|result| result.map_err(|e| StorageError::DownloadFailed(e.to_string())));

        Ok(StoredObject {
            content_type: Self::derive_content_type(storage_key),
            content_length,
            stream: Box::pin(stream),
        })
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    async fn test_storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let (_dir, storage) = test_storage().await;

        storage
            .put("misc-files/abc.png", "image/png", b"fake png".to_vec())
            .await
            .unwrap();

        let object = storage.get_stream("misc-files/abc.png").await.unwrap();
        assert_eq!(object.content_type.as_deref(), Some("image/png"));
        assert_eq!(object.content_length, Some(8));

        let chunks: Vec<bytes::Bytes> = object.stream.try_collect().await.unwrap();
        let body: Vec<u8> = chunks.concat();
        assert_eq!(body, b"fake png");
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let (_dir, storage) = test_storage().await;

        let err = storage.get_stream("misc-files/nope.png").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (_dir, storage) = test_storage().await;

        let err = storage.get_stream("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));

        let err = storage
            .put("/abs/path", "application/octet-stream", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn exists_reflects_writes() {
        let (_dir, storage) = test_storage().await;

        assert!(!storage.exists("misc-files/abc.mp3").await.unwrap());
        storage
            .put("misc-files/abc.mp3", "audio/mpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(storage.exists("misc-files/abc.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn put_stream_writes_reader_contents() {
        let (_dir, storage) = test_storage().await;

        let data = vec![7u8; 64 * 1024];
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> =
            Box::pin(std::io::Cursor::new(data.clone()));

        storage
            .put_stream("misc-files/big.mp4", "video/mp4", Some(data.len() as u64), reader)
            .await
            .unwrap();

        let object = storage.get_stream("misc-files/big.mp4").await.unwrap();
        assert_eq!(object.content_length, Some(data.len() as u64));
        assert_eq!(object.content_type.as_deref(), Some("video/mp4"));
    }
}
