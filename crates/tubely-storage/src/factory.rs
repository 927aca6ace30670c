//! Build the configured [`Storage`] backend.

#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Backend settings pulled out of [`Config`], checked before anything is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSettings {
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
    },
    Local {
        path: String,
        base_url: String,
    },
}

fn required(value: Option<&str>, variable: &str) -> StorageResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(StorageError::ConfigError(format!("{} not configured", variable))),
    }
}

impl StorageSettings {
    pub fn from_config(config: &Config) -> StorageResult<Self> {
        match config.storage_backend() {
            StorageBackend::S3 => Ok(Self::S3 {
                bucket: required(config.s3_bucket(), "S3_BUCKET")?,
                region: required(config.s3_region(), "S3_REGION or AWS_REGION")?,
                endpoint: config.s3_endpoint().map(String::from),
            }),
            StorageBackend::Local => Ok(Self::Local {
                path: required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?,
                base_url: required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?,
            }),
        }
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            Self::S3 { .. } => StorageBackend::S3,
            Self::Local { .. } => StorageBackend::Local,
        }
    }

    /// Open the backend. Fails if it was compiled out.
    pub async fn open(self) -> StorageResult<Arc<dyn Storage>> {
        match self {
            #[cfg(feature = "storage-s3")]
            Self::S3 {
                bucket,
                region,
                endpoint,
            } => Ok(Arc::new(S3Storage::new(bucket, region, endpoint).await?)),
            #[cfg(feature = "storage-local")]
            Self::Local { path, base_url } => Ok(Arc::new(LocalStorage::new(path, base_url).await?)),
            #[allow(unreachable_patterns)]
            other => Err(StorageError::ConfigError(format!(
                "{} storage backend not compiled into this build",
                other.backend()
            ))),
        }
    }
}

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    StorageSettings::from_config(config)?.open().await
}
