//! Upload orchestration: authorize, validate, stage, classify, remux, store, record.

pub mod pipeline;
pub mod staging;

pub use pipeline::{UploadPipeline, UploadPipelineConfig};
pub use staging::{stage_upload, BodyLimitExceeded};
