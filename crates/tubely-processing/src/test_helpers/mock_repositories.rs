//! Mock repository implementations for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tubely_core::{AppError, Video};
use tubely_db::VideoRepository;
use uuid::Uuid;

use super::lock;

/// Video repository backed by a `HashMap`, recording every successful update.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<Mutex<HashMap<Uuid, Video>>>,
    updates: Arc<Mutex<Vec<Video>>>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, video: Video) {
        lock(&self.videos).insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        lock(&self.videos).get(&id).cloned()
    }

    /// Number of successful `set_video_url` calls
    pub fn update_count(&self) -> usize {
        lock(&self.updates).len()
    }

    /// Make every subsequent `set_video_url` fail with a database error
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn set_video_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        location: &str,
    ) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }

        let mut videos = lock(&self.videos);
        match videos.get_mut(&id) {
            Some(existing) if existing.is_owned_by(user_id) => {
                existing.video_url = Some(location.to_string());
                existing.updated_at = Utc::now();
                lock(&self.updates).push(existing.clone());
                Ok(existing.clone())
            }
            _ => Err(AppError::NotFound(format!("Video {} not found for owner", id))),
        }
    }
}
