//! Record fixtures.

use chrono::Utc;
use tubely_core::Video;
use uuid::Uuid;

/// A freshly created video owned by `user_id`, not yet uploaded.
pub fn sample_video(user_id: Uuid) -> Video {
    let now = Utc::now();
    Video {
        id: Uuid::new_v4(),
        user_id,
        title: "Boots on the ground".to_string(),
        description: "A walk through the warehouse".to_string(),
        thumbnail_url: None,
        video_url: None,
        created_at: now,
        updated_at: now,
    }
}
