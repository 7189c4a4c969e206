//! Application state shared across handlers.

use playbox_core::Config;
use playbox_storage::Storage;
use std::sync::Arc;

/// Application state: configuration, the storage backend, and the pooled HTTP
/// client used by proxy-mode asset serving.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        AppState {
            config,
            storage,
            http: reqwest::Client::new(),
        }
    }
}
