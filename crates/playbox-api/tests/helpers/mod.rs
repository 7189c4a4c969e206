//! Test helpers: build AppState and router against the local storage backend.
//!
//! Run from workspace root: `cargo test -p playbox-api`.

use axum_test::TestServer;
use playbox_api::setup::routes;
use playbox_api::state::AppState;
use playbox_core::config::{AssetServeMode, Config, ServiceConfig};
use playbox_core::StorageBackend;
use playbox_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

/// Base URL the test config hands out in upload result links.
pub const PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Public store URL used by redirect-mode tests.
pub const STORE_PUBLIC_URL: &str = "https://assets.example.com";

/// Test application: server plus owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn Storage>,
    pub temp_dir: TempDir,
}

pub fn test_config(asset_serve_mode: AssetServeMode, r2_public_url: &str) -> Config {
    Config(Box::new(ServiceConfig {
        server_port: 8080,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        r2_public_url: r2_public_url.trim_end_matches('/').to_string(),
        r2_bucket: "playbox-arcade".to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        asset_serve_mode,
        max_upload_size_bytes: 8 * 1024 * 1024,
        upload_timeout_secs: 30,
        storage_backend: StorageBackend::Local,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: None,
    }))
}

/// Build a test app in redirect mode against the default store URL.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(AssetServeMode::Redirect, STORE_PUBLIC_URL).await
}

/// Build a test app with an explicit serve mode and store URL.
pub async fn setup_test_app_with(mode: AssetServeMode, r2_public_url: &str) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("create local storage"),
    );

    let config = test_config(mode, r2_public_url);
    let state = Arc::new(AppState::new(config.clone(), storage.clone()));
    let router = routes::setup_routes(&config, state).expect("build router");
    let server = TestServer::new(router).expect("start test server");

    TestApp {
        server,
        storage,
        temp_dir,
    }
}
