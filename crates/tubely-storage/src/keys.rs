//! Storage key derivation and the bucket-qualified reference stored on video records.
//!
//! Key format: `{orientation}/{id}.{ext}` where `id` is a fresh random UUID in
//! simple form and `ext` comes from the content type.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use tubely_core::constants::{normalize_content_type, FALLBACK_EXTENSION};
use tubely_core::Orientation;
use uuid::Uuid;

use crate::StorageError;

/// File extension for a content type: the subtype of `type/subtype`, or `bin`.
pub fn extension_for_content_type(content_type: &str) -> String {
    let normalized = normalize_content_type(content_type);
    let mut parts = normalized.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(subtype), None)
            if !kind.is_empty()
                && !subtype.is_empty()
                && subtype
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '+') =>
        {
            subtype.to_string()
        }
        _ => FALLBACK_EXTENSION.to_string(),
    }
}

/// Generate a unique storage key for an upload.
pub fn asset_key(content_type: &str, orientation: Orientation) -> String {
    asset_key_with_id(Uuid::new_v4(), content_type, orientation)
}

/// Storage key for a known identifier.
pub fn asset_key_with_id(id: Uuid, content_type: &str, orientation: Orientation) -> String {
    format!(
        "{}/{}.{}",
        orientation.as_str(),
        id.simple(),
        extension_for_content_type(content_type)
    )
}

/// Bucket-qualified location persisted in `videos.video_url`, formatted `"{bucket},{key}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReference {
    pub bucket: String,
    pub key: String,
}

impl StorageReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl Display for StorageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{},{}", self.bucket, self.key)
    }
}

impl FromStr for StorageReference {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                Ok(StorageReference::new(bucket, key))
            }
            _ => Err(StorageError::InvalidKey(format!(
                "Malformed storage reference: {}",
                s
            ))),
        }
    }
}
