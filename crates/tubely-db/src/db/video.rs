use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::{AppError, Video};
use uuid::Uuid;

/// Access to video records.
///
/// Records are created by another part of the product; this service reads them
/// and rewrites their location fields.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Point the video at a stored object, leaving every other field as it is in the table.
    ///
    /// Only a row still owned by `user_id` is updated; anything else is `NotFound`.
    /// Returns the row as written.
    async fn set_video_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        location: &str,
    ) -> Result<Video, AppError>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, location), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_video_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        location: &str,
    ) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos
            SET video_url = $3,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(location)
        .fetch_optional(&self.pool)
        .await?;

        video.ok_or_else(|| AppError::NotFound(format!("Video {} not found for owner", id)))
    }
}
