use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::StreamExt;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::ReaderStream;

/// S3-compatible storage implementation (R2, MinIO, AWS S3)
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - bucket name
    /// * `region` - region identifier (R2 uses "auto")
    /// * `endpoint_url` - custom endpoint URL for S3-compatible providers
    ///   (e.g. "https://<account>.r2.cloudflarestorage.com" or
    ///   "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let region_provider = RegionProviderChain::first_try(aws_config::Region::new(region));

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        // S3-compatible providers need the custom endpoint and path-style addressing
        let client = if let Some(ref endpoint) = endpoint_url {
            let mut s3_config_builder = aws_sdk_s3::Config::builder()
                .endpoint_url(endpoint)
                .region(config.region().cloned());
            if let Some(provider) = config.credentials_provider().into_iter().next() {
                s3_config_builder = s3_config_builder.credentials_provider(provider);
            }
            s3_config_builder = s3_config_builder.force_path_style(true);

            Client::from_conf(s3_config_builder.build())
        } else {
            Client::new(&config)
        };

        Ok(S3Storage { client, bucket })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(&self, storage_key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()> {
        let size = data.len() as u64;
        let body = ByteStream::from(Bytes::from(data));
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        // Multipart upload for large payloads; parts except the last must be
        // at least 5MB.
        const MULTIPART_THRESHOLD: u64 = 5 * 1024 * 1024;
        const PART_SIZE: usize = 5 * 1024 * 1024;

        let use_multipart = content_length
            .map(|len| len > MULTIPART_THRESHOLD)
            .unwrap_or(true);

        if use_multipart {
            let create_result = self
                .client
                .create_multipart_upload()
                .bucket(&self.bucket)
                .key(storage_key)
                .content_type(content_type)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %storage_key,
                        "Failed to create multipart upload"
                    );
                    StorageError::UploadFailed(e.to_string())
                })?;

            let upload_id = create_result.upload_id().ok_or_else(|| {
                StorageError::UploadFailed("No upload ID returned from S3".to_string())
            })?;

            let result = self
                .upload_parts(storage_key, upload_id, PART_SIZE, &mut reader)
                .await;

            let (parts, total_size) = match result {
                Ok(v) => v,
                Err(e) => {
                    // Best effort: don't leave a dangling multipart upload behind
                    let _ = self
                        .client
                        .abort_multipart_upload()
                        .bucket(&self.bucket)
                        .key(storage_key)
                        .upload_id(upload_id)
                        .send()
                        .await;
                    return Err(e);
                }
            };

            let part_count = parts.len();
            let completed_parts = CompletedMultipartUpload::builder()
                .set_parts(Some(parts))
                .build();

            self.client
                .complete_multipart_upload()
                .bucket(&self.bucket)
                .key(storage_key)
                .upload_id(upload_id)
                .multipart_upload(completed_parts)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %storage_key,
                        "Failed to complete multipart upload"
                    );
                    StorageError::UploadFailed(e.to_string())
                })?;

            tracing::info!(
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = total_size,
                parts = part_count,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 multipart stream upload successful"
            );

            Ok(())
        } else {
            // Small payloads: drain the reader and use a regular upload
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer).await.map_err(|e| {
                StorageError::UploadFailed(format!("Failed to read from stream: {}", e))
            })?;

            self.put(storage_key, content_type, buffer).await
        }
    }

    async fn get_stream(&self, storage_key: &str) -> StorageResult<StoredObject> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    GetObjectError::NoSuchKey(_) => StorageError::NotFound(storage_key.to_string()),
                    _ => {
                        tracing::error!(
                            error = %e,
                            bucket = %self.bucket,
                            key = %storage_key,
                            "S3 download failed"
                        );
                        StorageError::DownloadFailed(e.to_string())
                    }
                },
                _ => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %storage_key,
                        "S3 download failed"
                    );
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let content_type = response.content_type().map(String::from);
        let content_length = response.content_length().and_then(|len| u64::try_from(len).ok());

        let bucket = self.bucket.clone();
        let key = storage_key.to_string();
        let stream = ReaderStream::new(response.body.into_async_read()).map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream download error"
                );
                StorageError::DownloadFailed(e.to_string())
            })
        });

        Ok(StoredObject {
            content_type,
            content_length,
            stream: Box::pin(stream),
        })
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    HeadObjectError::NotFound(_) => Ok(false),
                    _ => Err(StorageError::BackendError(e.to_string())),
                },
                _ => Err(StorageError::BackendError(e.to_string())),
            },
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

impl S3Storage {
    /// Read the stream part by part and upload each; returns the completed
    /// parts and total byte count.
    async fn upload_parts(
        &self,
        storage_key: &str,
        upload_id: &str,
        part_size: usize,
        reader: &mut Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<(Vec<CompletedPart>, u64)> {
        let mut part_number = 1i32;
        let mut parts = Vec::new();
        let mut part_buffer = vec![0u8; part_size];
        let mut total_size = 0u64;

        loop {
            let mut bytes_in_part = 0usize;
            while bytes_in_part < part_size {
                let bytes_read = reader
                    .read(&mut part_buffer[bytes_in_part..])
                    .await
                    .map_err(|e| {
                        StorageError::UploadFailed(format!("Failed to read from stream: {}", e))
                    })?;

                if bytes_read == 0 {
                    break; // EOF
                }

                bytes_in_part += bytes_read;
            }

            if bytes_in_part == 0 {
                break;
            }

            total_size += bytes_in_part as u64;

            let part_body = ByteStream::from(Bytes::copy_from_slice(&part_buffer[..bytes_in_part]));

            let upload_part_result = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(storage_key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(part_body)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %storage_key,
                        part_number = part_number,
                        "Failed to upload part"
                    );
                    StorageError::UploadFailed(e.to_string())
                })?;

            let etag = upload_part_result
                .e_tag()
                .ok_or_else(|| {
                    StorageError::UploadFailed(format!("No ETag returned for part {}", part_number))
                })?
                .to_string();

            parts.push(
                CompletedPart::builder()
                    .part_number(part_number)
                    .e_tag(etag)
                    .build(),
            );

            part_number += 1;

            if bytes_in_part < part_size {
                break; // short read means EOF
            }
        }

        Ok((parts, total_size))
    }
}
