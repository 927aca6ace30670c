//! Tubely Storage Library
//!
//! This crate provides the object storage abstraction used by the upload
//! pipeline, with implementations for S3 (through `object_store`) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! Uploaded videos are stored under `{orientation}/{id}.{ext}`, for example
//! `landscape/0f3c2a9d6b7e4f0a8c1d2e3f4a5b6c7d.mp4`. Records never hold a URL;
//! they hold a [`StorageReference`] (`"{bucket},{key}"`) which is turned into a
//! presigned URL when a video is returned to a client.
//!
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, StorageSettings};
pub use keys::{asset_key, asset_key_with_id, extension_for_content_type, StorageReference};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
