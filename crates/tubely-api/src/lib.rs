//! Tubely API Library
//!
//! HTTP handlers, authentication, error rendering and application setup for
//! the video upload service.

mod api_doc;
mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
