//! Fast-start remux: move the MP4 index to the front of the file with a stream copy.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tubely_core::constants::PROCESSED_FILE_SUFFIX;
use tubely_core::AppError;

use super::command::{check_status, run_with_timeout, validate_tool_path};

/// Rewrites a local video for progressive playback.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Write the remuxed file to [`processed_path`] of `input` and return that path.
    ///
    /// The caller owns the output file and is responsible for removing it.
    async fn remux(&self, input: &Path) -> Result<PathBuf, AppError>;
}

/// Output location for a remux of `input`: the same path with `.processing` appended.
pub fn processed_path(input: &Path) -> PathBuf {
    let mut path: OsString = input.as_os_str().to_owned();
    path.push(PROCESSED_FILE_SUFFIX);
    PathBuf::from(path)
}

pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Result<Self> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> Result<PathBuf, AppError> {
        let start = std::time::Instant::now();
        let output_path = processed_path(input);

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path);

        let output = run_with_timeout("ffmpeg", command, self.timeout).await?;
        check_status("ffmpeg", &output)?;

        let metadata = tokio::fs::metadata(&output_path).await.map_err(|e| {
            AppError::MediaProcessing(format!(
                "ffmpeg produced no output at {}: {}",
                output_path.display(),
                e
            ))
        })?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            size_bytes = metadata.len(),
            "Fast-start remux completed"
        );

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_path_appends_suffix() {
        assert_eq!(
            processed_path(Path::new("/tmp/tubely-upload-abc.mp4")),
            PathBuf::from("/tmp/tubely-upload-abc.mp4.processing")
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error() {
        let remuxer = FfmpegRemuxer::new("false", Duration::from_secs(5)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = remuxer
            .remux(&dir.path().join("input.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MediaProcessing(_)));
    }

    #[tokio::test]
    async fn test_missing_output_is_error() {
        // `true` exits 0 without writing anything.
        let remuxer = FfmpegRemuxer::new("true", Duration::from_secs(5)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = remuxer
            .remux(&dir.path().join("input.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MediaProcessing(ref msg) if msg.contains("no output")));
    }
}
