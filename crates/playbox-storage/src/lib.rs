//! Playbox Storage Library
//!
//! Storage abstraction over the external object store. The service itself is
//! stateless; every object lives in the store, addressed by key.
//!
//! # Storage key layout
//!
//! Keys are built by `playbox_core::keys`: `games/{id}/...` for bundle assets
//! and `misc-files/{id}{ext}` for uploaded files. Keys must not contain `..`
//! or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use playbox_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStream, Storage, StorageError, StorageResult, StoredObject};
