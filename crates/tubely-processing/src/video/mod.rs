//! External media tools: `ffprobe` for inspection and `ffmpeg` for remuxing.
//!
//! Both sit behind traits so an in-process implementation (or a test fake)
//! can replace the subprocesses.

mod command;
pub mod probe;
pub mod remux;

pub use probe::{parse_probe_output, FfprobeInspector, MediaInspector};
pub use remux::{processed_path, FfmpegRemuxer, Remuxer};
