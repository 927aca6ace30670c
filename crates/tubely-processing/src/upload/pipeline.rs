//! Upload pipeline: authorize → validate → stage → classify → remux → store → record.

use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tubely_core::constants::{normalize_content_type, ACCEPTED_VIDEO_CONTENT_TYPE};
use tubely_core::{AppError, Config, Video};
use tubely_db::VideoRepository;
use tubely_storage::{asset_key, Storage, StorageReference};
use uuid::Uuid;

use super::staging::stage_upload;
use crate::scratch::ScratchFile;
use crate::video::{processed_path, MediaInspector, Remuxer};

/// Settings the pipeline needs from the service configuration.
#[derive(Clone, Debug)]
pub struct UploadPipelineConfig {
    /// Directory staged uploads and remux output are written to
    pub scratch_dir: PathBuf,
    pub max_video_size_bytes: u64,
}

impl UploadPipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scratch_dir: config.upload_temp_dir(),
            max_video_size_bytes: config.max_video_size_bytes() as u64,
        }
    }
}

/// Orchestrates one video upload from request body to updated record.
///
/// Every collaborator is a trait object so the pipeline runs unchanged against
/// Postgres/S3/ffmpeg in production and in-memory fakes in tests.
#[derive(Clone)]
pub struct UploadPipeline {
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    inspector: Arc<dyn MediaInspector>,
    remuxer: Arc<dyn Remuxer>,
    config: UploadPipelineConfig,
}

impl UploadPipeline {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        inspector: Arc<dyn MediaInspector>,
        remuxer: Arc<dyn Remuxer>,
        config: UploadPipelineConfig,
    ) -> Self {
        Self {
            videos,
            storage,
            inspector,
            remuxer,
            config,
        }
    }

    pub fn config(&self) -> &UploadPipelineConfig {
        &self.config
    }

    /// Load the video and check that `user_id` owns it.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(
                video_id = %video_id,
                user_id = %user_id,
                owner_id = %video.user_id,
                "Upload rejected: not the video owner"
            );
            return Err(AppError::Forbidden(
                "You are not the owner of this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Normalize a declared content type and check it against the accepted container.
    pub fn validate_content_type(content_type: Option<&str>) -> Result<String, AppError> {
        let declared = content_type.unwrap_or_default();
        let normalized = normalize_content_type(declared);
        if normalized != ACCEPTED_VIDEO_CONTENT_TYPE {
            return Err(AppError::UnsupportedMediaType(format!(
                "Invalid file type '{}', expected {}",
                declared, ACCEPTED_VIDEO_CONTENT_TYPE
            )));
        }
        Ok(normalized)
    }

    /// Run the full pipeline for an already-authorized video and return the updated record.
    ///
    /// The content type is checked before any byte of `body` is read. Scratch
    /// files are removed on every path out of this function.
    #[tracing::instrument(skip(self, video, body), fields(video_id = %video.id, user_id = %video.user_id))]
    pub async fn process<R>(
        &self,
        video: Video,
        content_type: Option<&str>,
        body: R,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Send + Unpin,
    {
        let start = std::time::Instant::now();
        let content_type = Self::validate_content_type(content_type)?;

        let staged = stage_upload(
            body,
            &self.config.scratch_dir,
            self.config.max_video_size_bytes,
        )
        .await?;

        let dimensions = self.inspector.inspect(staged.path()).await?;
        let orientation = dimensions.orientation();

        // Guard the remux output before it exists so a failed or cancelled run cannot leak it.
        let _expected_output = ScratchFile::adopt(processed_path(staged.path()));
        let processed = self.remuxer.remux(staged.path()).await?;
        let _processed = ScratchFile::adopt(processed.clone());

        let key = asset_key(&content_type, orientation);
        let file = tokio::fs::File::open(&processed)
            .await
            .map_err(|e| AppError::io("Failed to open processed video", e))?;
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> = Box::pin(file);
        let size_bytes = self.storage.put_stream(&key, &content_type, reader).await?;

        let reference = StorageReference::new(self.storage.bucket(), key.clone());
        let updated = self
            .videos
            .set_video_url(video.id, video.user_id, &reference.to_string())
            .await?;

        tracing::info!(
            key = %key,
            orientation = %orientation,
            width = dimensions.width,
            height = dimensions.height,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video upload processed"
        );

        Ok(updated)
    }

    /// Authorize and process in one call.
    pub async fn upload<R>(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        content_type: Option<&str>,
        body: R,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Send + Unpin,
    {
        let video = self.authorize(video_id, user_id).await?;
        self.process(video, content_type, body).await
    }
}
