//! Serve uploaded misc files out of the object store.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::transfer::relay_body;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use playbox_core::{keys, media_type, AppError};
use std::sync::Arc;

/// `GET /misc-file/{file_id}` - the path segment carries the extension
/// (e.g. `/misc-file/0190cafe.png`); it is split off and the object at
/// `misc-files/{stem}{ext}` is streamed through.
pub async fn serve_misc_file(
    Path(file_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let (stem, ext) = media_type::split_extension(&file_id);
    let key = keys::misc_file_key(stem, ext)?;

    tracing::debug!(key = %key, "Fetching misc file from store");

    let object = state.storage.get_stream(&key).await.map_err(|e| {
        tracing::warn!(file_id = %file_id, key = %key, error = %e, "Misc file fetch failed");
        HttpAppError::from(e)
    })?;

    let content_type = media_type::resolve(ext, object.content_type.as_deref());
    let content_length = object.content_length;

    let (body, _progress) = relay_body(object.stream, key);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000");
    if let Some(len) = content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    builder.body(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to build response");
        HttpAppError::from(AppError::Internal(e.to_string()))
    })
}
