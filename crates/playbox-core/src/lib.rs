//! Playbox Core Library
//!
//! This crate provides configuration, error types, content-type resolution,
//! and object-key construction shared across all Playbox components.

pub mod config;
pub mod error;
pub mod keys;
pub mod media_type;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AssetServeMode, Config, ServiceConfig};
pub use error::{AppError, LogLevel};
pub use storage_types::StorageBackend;
