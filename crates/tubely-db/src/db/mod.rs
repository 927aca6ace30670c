//! Database repositories for the data access layer
//!
//! The upload pipeline depends on the `VideoRepository` trait only; the
//! Postgres implementation is wired in at startup.

pub mod video;

pub use video::{PgVideoRepository, VideoRepository};
