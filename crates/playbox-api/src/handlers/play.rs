//! Game wrapper page: serves an HTML shell embedding the bundle in an iframe.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Html,
};
use playbox_core::config::AssetServeMode;
use playbox_core::keys;
use std::sync::Arc;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Full-viewport wrapper page pointing the iframe at the bundle root.
fn wrapper_page(game_id: &str, bundle_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Game: {title}</title>
    <style>
        body, html {{
            margin: 0;
            padding: 0;
            width: 100%;
            height: 100%;
            overflow: hidden;
        }}
        iframe {{
            border: none;
            width: 100%;
            height: 100%;
            display: block;
        }}
    </style>
</head>
<body>
    <iframe src="{src}" allowfullscreen allow="gamepad; microphone; camera; autoplay"></iframe>
</body>
</html>"#,
        title = html_escape(game_id),
        src = html_escape(bundle_url),
    )
}

/// `GET /play/{game_id}` - HTML shell for a game bundle. The content type is
/// always `text/html; charset=utf-8`.
pub async fn play_game(
    Path(game_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, HttpAppError> {
    let key = keys::game_bundle_key(&game_id, "")?;

    // In proxy mode the bucket may not be publicly reachable, so the iframe
    // goes back through this service's asset route.
    let bundle_url = match state.config.asset_serve_mode() {
        AssetServeMode::Redirect => keys::public_url(state.config.r2_public_url(), &key),
        AssetServeMode::Proxy => format!(
            "{}/play/{}/{}",
            state.config.public_base_url(),
            keys::escape_id(game_id.trim()),
            keys::BUNDLE_ROOT_DOCUMENT
        ),
    };

    tracing::info!(game_id = %game_id.trim(), url = %bundle_url, "Serving game wrapper page");

    Ok(Html(wrapper_page(game_id.trim(), &bundle_url)))
}
