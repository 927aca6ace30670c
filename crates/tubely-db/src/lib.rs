//! Tubely Database Library
//!
//! Data access for video records.

pub mod db;

pub use db::{PgVideoRepository, VideoRepository};
