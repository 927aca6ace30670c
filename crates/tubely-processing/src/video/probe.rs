//! Aspect classification input: first video stream dimensions via `ffprobe`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tubely_core::models::Dimensions;
use tubely_core::AppError;

use super::command::{check_status, run_with_timeout, validate_tool_path};

/// Reads the pixel dimensions of a local video file.
#[async_trait]
pub trait MediaInspector: Send + Sync {
    async fn inspect(&self, path: &Path) -> Result<Dimensions, AppError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u64>,
    height: Option<u64>,
}

/// Parse `ffprobe -print_format json -show_streams` output into the first stream's dimensions.
///
/// An empty stream list, missing or zero dimensions, or malformed JSON is an
/// error; nothing is defaulted.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions, AppError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| {
        AppError::MediaProcessing(format!("Failed to parse ffprobe output: {}", e))
    })?;

    let stream = probe
        .streams
        .first()
        .ok_or_else(|| AppError::MediaProcessing("No video stream found".to_string()))?;

    let width = dimension(stream.width, "width")?;
    let height = dimension(stream.height, "height")?;

    Ok(Dimensions::new(width, height))
}

fn dimension(value: Option<u64>, name: &str) -> Result<u32, AppError> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| AppError::MediaProcessing(format!("Could not parse {}", name)))
}

pub struct FfprobeInspector {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeInspector {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Result<Self> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path).context("Invalid ffprobe_path")?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn inspect(&self, path: &Path) -> Result<Dimensions, AppError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(path);

        let output = run_with_timeout("ffprobe", command, self.timeout).await?;
        check_status("ffprobe", &output)?;

        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            width = dimensions.width,
            height = dimensions.height,
            orientation = %dimensions.orientation(),
            "Video probe completed"
        );

        Ok(dimensions)
    }
}
