//! Route configuration and setup.

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use playbox_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    // The upload handler enforces the configured ceiling itself so oversized
    // files get a 400; the body-limit layers sit well above it as a hard
    // backstop against unbounded bodies.
    let body_limit = config.max_upload_size_bytes().saturating_mul(2);

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/play/{game_id}", get(handlers::play::play_game))
        .route(
            "/play/{game_id}/{*asset_path}",
            get(handlers::assets::serve_asset),
        )
        .route(
            "/misc-file/upload",
            post(handlers::misc_file_upload::upload_misc_file),
        )
        .route(
            "/misc-file/{file_id}",
            get(handlers::misc_file::serve_misc_file),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
