//! Wiring of repositories, media tools and the upload pipeline into `AppState`.

use crate::auth::JwtService;
use crate::state::AppState;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{PgVideoRepository, VideoRepository};
use tubely_processing::{
    FfmpegRemuxer, FfprobeInspector, MediaInspector, Remuxer, UploadPipeline,
    UploadPipelineConfig,
};
use tubely_storage::Storage;

pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let videos: Arc<dyn VideoRepository> = Arc::new(PgVideoRepository::new(pool));

    let inspector: Arc<dyn MediaInspector> = Arc::new(FfprobeInspector::new(
        config.ffprobe_path(),
        config.subprocess_timeout(),
    )?);
    let remuxer: Arc<dyn Remuxer> = Arc::new(FfmpegRemuxer::new(
        config.ffmpeg_path(),
        config.subprocess_timeout(),
    )?);

    let pipeline_config = UploadPipelineConfig::from_config(config);
    tokio::fs::create_dir_all(&pipeline_config.scratch_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                pipeline_config.scratch_dir.display()
            )
        })?;
    tracing::info!(
        scratch_dir = %pipeline_config.scratch_dir.display(),
        max_video_mb = pipeline_config.max_video_size_bytes / 1024 / 1024,
        ffprobe_path = %config.ffprobe_path(),
        ffmpeg_path = %config.ffmpeg_path(),
        "Upload pipeline configured"
    );

    let pipeline = UploadPipeline::new(
        videos,
        storage.clone(),
        inspector,
        remuxer,
        pipeline_config,
    );

    Ok(Arc::new(AppState {
        pipeline,
        storage,
        jwt: Arc::new(JwtService::new(config.jwt_secret(), config.jwt_issuer())),
        presigned_url_ttl: config.presigned_url_ttl(),
    }))
}
