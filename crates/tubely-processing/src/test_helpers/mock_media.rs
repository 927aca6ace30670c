//! Media tool fakes that never spawn a process.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tubely_core::models::Dimensions;
use tubely_core::AppError;

use crate::video::{processed_path, MediaInspector, Remuxer};

/// Inspector that reports fixed dimensions, or fails like an unreadable file.
#[derive(Clone, Default)]
pub struct StaticInspector {
    dimensions: Option<Dimensions>,
    calls: Arc<AtomicUsize>,
}

impl StaticInspector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Some(Dimensions::new(width, height)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaInspector for StaticInspector {
    async fn inspect(&self, path: &Path) -> Result<Dimensions, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !path.exists() {
            return Err(AppError::MediaProcessing(format!(
                "{} does not exist",
                path.display()
            )));
        }
        self.dimensions
            .ok_or_else(|| AppError::MediaProcessing("No video stream found".to_string()))
    }
}

/// Remuxer that copies its input to the processed path, or fails after writing a partial file.
#[derive(Clone, Default)]
pub struct CopyRemuxer {
    fail: bool,
    calls: Arc<AtomicUsize>,
    last_output: Arc<Mutex<Option<PathBuf>>>,
}

impl CopyRemuxer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Path of the most recent output, written or partial
    pub fn last_output(&self) -> Option<PathBuf> {
        super::lock(&self.last_output).clone()
    }
}

#[async_trait]
impl Remuxer for CopyRemuxer {
    async fn remux(&self, input: &Path) -> Result<PathBuf, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = processed_path(input);
        *super::lock(&self.last_output) = Some(output.clone());

        if self.fail {
            tokio::fs::write(&output, b"partial").await?;
            return Err(AppError::MediaProcessing(
                "ffmpeg failed with exit status: 1".to_string(),
            ));
        }

        tokio::fs::copy(input, &output).await?;
        Ok(output)
    }
}
