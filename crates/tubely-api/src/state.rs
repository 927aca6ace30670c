//! Application state shared by all handlers.

use std::sync::Arc;
use std::time::Duration;

use tubely_core::{AppError, Video, VideoResponse};
use tubely_processing::UploadPipeline;
use tubely_storage::{Storage, StorageReference};

use crate::auth::jwt::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: UploadPipeline,
    pub storage: Arc<dyn Storage>,
    pub jwt: Arc<JwtService>,
    /// Lifetime of the signed URLs handed out in video responses
    pub presigned_url_ttl: Duration,
}

impl AppState {
    /// Turn a record into a response, expanding its stored location into a signed URL.
    pub async fn build_video_response(&self, video: Video) -> Result<VideoResponse, AppError> {
        let signed_url = match video.video_url.as_deref() {
            Some(location) => Some(self.sign_location(location).await?),
            None => None,
        };
        Ok(VideoResponse::from_video(video, signed_url))
    }

    async fn sign_location(&self, location: &str) -> Result<String, AppError> {
        let reference: StorageReference = location.parse()?;
        if reference.bucket != self.storage.bucket() {
            tracing::warn!(
                stored_bucket = %reference.bucket,
                configured_bucket = %self.storage.bucket(),
                key = %reference.key,
                "Video location refers to a bucket this service does not serve"
            );
            return Err(AppError::Storage(format!(
                "Unknown bucket '{}' in stored video location",
                reference.bucket
            )));
        }

        let url = self
            .storage
            .presigned_url(&reference.key, self.presigned_url_ttl)
            .await?;
        Ok(url)
    }
}
