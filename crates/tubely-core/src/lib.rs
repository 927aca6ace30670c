//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration and constants
//! shared by every Tubely component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, UploadServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Orientation, Video, VideoResponse};
pub use storage_types::StorageBackend;
