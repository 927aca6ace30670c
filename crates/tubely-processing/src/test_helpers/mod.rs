//! Test helpers for pipeline and handler tests
//!
//! In-memory stand-ins for the datastore, the object store and the media
//! tools, so the full upload flow runs without Postgres, S3 or ffmpeg.

pub mod fixtures;
pub mod mock_media;
pub mod mock_repositories;
pub mod mock_storage;

pub use fixtures::*;
pub use mock_media::{CopyRemuxer, StaticInspector};
pub use mock_repositories::InMemoryVideoRepository;
pub use mock_storage::{InMemoryStorage, StoredObject};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a panicking test poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
