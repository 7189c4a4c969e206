//! Bundle asset serving: redirect to the store's public URL, or fetch and
//! stream the bytes through with rewritten headers.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::transfer::relay_body;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use playbox_core::config::AssetServeMode;
use playbox_core::{keys, media_type, AppError};
use std::sync::Arc;

/// Cache policy for proxied assets. The bundle root updates in place, so it
/// is never cached; everything else is addressed under a bundle path and can
/// be held for an hour.
fn cache_control(asset_path: &str) -> &'static str {
    if asset_path.is_empty() {
        "no-cache"
    } else {
        "public, max-age=3600"
    }
}

/// Content type for a bundle asset. An empty sub-path addresses the root
/// document, which is always HTML regardless of what the store reports.
fn asset_content_type(asset_path: &str, upstream: Option<&str>) -> String {
    if asset_path.is_empty() {
        return media_type::HTML.to_string();
    }
    media_type::resolve(media_type::extension_of(asset_path), upstream)
}

/// `GET /play/{game_id}/{*asset_path}` - serve one file out of a game bundle.
pub async fn serve_asset(
    Path((game_id, asset_path)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let key = keys::game_bundle_key(&game_id, &asset_path)?;
    let url = keys::public_url(state.config.r2_public_url(), &key);

    match state.config.asset_serve_mode() {
        AssetServeMode::Redirect => {
            tracing::info!(game_id = %game_id.trim(), url = %url, "Redirecting asset to store");
            Ok(Redirect::temporary(&url).into_response())
        }
        AssetServeMode::Proxy => proxy_asset(&state, &asset_path, key, &url).await,
    }
}

/// Fetch the asset from the store's public URL and stream it through.
/// A non-success upstream status is propagated to the client as-is.
async fn proxy_asset(
    state: &AppState,
    asset_path: &str,
    key: String,
    url: &str,
) -> Result<Response, HttpAppError> {
    let upstream = state.http.get(url).send().await.map_err(|e| {
        tracing::error!(error = %e, url = %url, "Failed to reach asset store");
        AppError::Internal(format!("Failed to fetch {}: {}", url, e))
    })?;

    let status = upstream.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = status.as_u16(), "Asset store returned non-success");
        return Err(AppError::Upstream {
            status: status.as_u16(),
        }
        .into());
    }

    let upstream_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let content_type = asset_content_type(asset_path, upstream_type.as_deref());
    let content_length = upstream.content_length();

    let (body, _progress) = relay_body(upstream.bytes_stream(), key);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, cache_control(asset_path));
    if let Some(len) = content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    builder.body(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to build response");
        HttpAppError::from(AppError::Internal(e.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_document_is_always_html() {
        assert_eq!(asset_content_type("", Some("application/octet-stream")), media_type::HTML);
        assert_eq!(asset_content_type("", Some("image/png")), media_type::HTML);
        assert_eq!(asset_content_type("", None), media_type::HTML);
    }

    #[test]
    fn known_extensions_use_the_table() {
        assert_eq!(
            asset_content_type("src/main.js", Some("text/plain")),
            "application/javascript"
        );
        assert_eq!(asset_content_type("game.wasm", None), "application/wasm");
    }

    #[test]
    fn unknown_extensions_fall_back_to_upstream_then_generic() {
        assert_eq!(asset_content_type("font.woff2", Some("font/woff2")), "font/woff2");
        assert_eq!(asset_content_type("blob.dat", None), media_type::OCTET_STREAM);
    }

    #[test]
    fn root_document_is_never_cached() {
        assert_eq!(cache_control(""), "no-cache");
        assert_eq!(cache_control("sprites.png"), "public, max-age=3600");
    }
}
