//! Storage setup and initialization

use anyhow::Result;
use playbox_core::Config;
use playbox_storage::{create_storage, Storage};
use std::sync::Arc;

/// Construct the storage backend named by the configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %config.r2_bucket(),
        "Storage backend initialized"
    );
    Ok(storage)
}
