//! Misc file upload: multipart form in, store write out.
//!
//! The file body is fed chunk by chunk into the storage writer while it runs,
//! so the payload is never buffered whole. The JSON result is only sent after
//! the store confirms the write.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::validate_upload_extension;
use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use bytes::Bytes;
use futures::SinkExt;
use playbox_core::{keys, media_type, AppError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::io::StreamReader;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub ok: bool,
    pub url: String,
    pub file_id: String,
    pub message: String,
}

/// `POST /misc-file/upload` - accepts a multipart form with a single `file`
/// field, validates its extension, and streams it into the store under a
/// time-ordered unique id.
pub async fn upload_misc_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to parse form: {}", e)))?
    {
        if field.name() == Some("file") {
            return store_upload(&state, field).await;
        }
    }

    Err(AppError::BadRequest("Missing file field 'file'".to_string()).into())
}

/// Validate the field, then pump it into the storage writer.
async fn store_upload(
    state: &AppState,
    mut field: Field<'_>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let ext = validate_upload_extension(&filename)?;

    // Time-ordered, effectively collision-free
    let id = Uuid::now_v7();
    let key = keys::misc_file_key(&id.to_string(), &ext)?;
    let content_type = media_type::upload_content_type(&ext);
    let max_size = state.config.max_upload_size_bytes();

    tracing::info!(
        key = %key,
        content_type = %content_type,
        filename = %filename,
        "Uploading misc file to store"
    );

    // The multipart field cannot outlive this handler, so the store writer
    // reads from a channel the field is pumped into alongside it.
    let (mut tx, rx) = futures::channel::mpsc::channel::<Result<Bytes, std::io::Error>>(8);
    let reader = StreamReader::new(rx);

    let write = state
        .storage
        .put_stream(&key, content_type, None, Box::pin(reader));

    let feed = async move {
        let mut total: usize = 0;
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    total += chunk.len();
                    if total > max_size {
                        let _ = tx
                            .send(Err(std::io::Error::other("upload ceiling exceeded")))
                            .await;
                        return Err(AppError::PayloadTooLarge(format!(
                            "File size exceeds maximum allowed size of {} MB",
                            max_size / 1024 / 1024
                        )));
                    }
                    if tx.send(Ok(chunk)).await.is_err() {
                        // Writer hung up; its error is surfaced below.
                        return Ok(());
                    }
                }
                Ok(None) => return Ok(()),
                Err(e) => {
                    let _ = tx.send(Err(std::io::Error::other(e.to_string()))).await;
                    return Err(AppError::BadRequest(format!(
                        "Failed to read file data: {}",
                        e
                    )));
                }
            }
        }
    };

    let timeout = Duration::from_secs(state.config.upload_timeout_secs());
    let (write_result, feed_result) =
        tokio::time::timeout(timeout, futures::future::join(write, feed))
            .await
            .map_err(|_| {
                tracing::error!(key = %key, "Store write timed out");
                AppError::Internal("Upload timed out".to_string())
            })?;

    // Client-side failures (malformed form, oversize) take precedence over
    // the writer's induced read error.
    feed_result?;
    write_result.map_err(HttpAppError::from)?;

    let url = format!(
        "{}/misc-file/{}{}",
        state.config.public_base_url(),
        id,
        ext
    );

    tracing::info!(key = %key, url = %url, "Misc file uploaded successfully");

    Ok(Json(UploadResponse {
        ok: true,
        url,
        file_id: id.to_string(),
        message: "File uploaded successfully".to_string(),
    }))
}
