//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use std::time::Duration;
use tubely_core::{Config, StorageBackend};

/// Longest lifetime S3 accepts for a SigV4 presigned URL
const MAX_PRESIGNED_URL_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Validate critical configuration values, failing fast on anything that would
/// only surface at request time.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via the CORS_ORIGINS environment variable."
        ));
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    let ttl = config.presigned_url_ttl();
    if ttl.is_zero() {
        return Err(anyhow::anyhow!("PRESIGNED_URL_TTL_SECS must be greater than 0"));
    }
    if config.storage_backend() == StorageBackend::S3 && ttl > MAX_PRESIGNED_URL_TTL {
        return Err(anyhow::anyhow!(
            "PRESIGNED_URL_TTL_SECS cannot exceed {} seconds for S3",
            MAX_PRESIGNED_URL_TTL.as_secs()
        ));
    }

    if config.max_video_size_bytes() < 1024 * 1024 {
        tracing::warn!(
            max_video_size_bytes = config.max_video_size_bytes(),
            "Maximum video size is below 1 MB; most uploads will be rejected"
        );
    }

    Ok(())
}
