//! Tubely Processing Library
//!
//! The upload-and-process pipeline: staging an upload to a scratch file,
//! classifying its aspect ratio with `ffprobe`, remuxing it for fast start with
//! `ffmpeg`, storing the result and recording its location on the video.

pub mod scratch;
pub mod upload;
pub mod video;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use scratch::ScratchFile;
pub use upload::{UploadPipeline, UploadPipelineConfig};
pub use video::{FfmpegRemuxer, FfprobeInspector, MediaInspector, Remuxer};
