use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_video_id;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use futures::TryStreamExt;
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use tubely_core::constants::VIDEO_FORM_FIELD;
use tubely_core::{AppError, VideoResponse};
use tubely_processing::upload::BodyLimitExceeded;

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    tag = "videos",
    params(
        ("video_id" = uuid::Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "File part named `video` with content type video/mp4"),
    responses(
        (status = 200, description = "Video uploaded and processed", body = VideoResponse),
        (status = 400, description = "Invalid video ID or missing file part", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Video belongs to another user", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported content type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %auth.user_id, video_id = %video_id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    // Ownership is settled before any part of the body is read.
    let video = state.pipeline.authorize(video_id, auth.user_id).await?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FORM_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        tracing::debug!(
            file_name = ?field.file_name(),
            content_type = ?content_type,
            "Receiving video part"
        );

        let body = StreamReader::new(Box::pin(field.map_err(multipart_io_error)));
        let updated = state
            .pipeline
            .process(video, content_type.as_deref(), body)
            .await?;

        let response = state.build_video_response(updated).await?;
        return Ok(Json(response));
    }

    Err(AppError::BadRequest(format!(
        "Missing '{}' file field in multipart body",
        VIDEO_FORM_FIELD
    ))
    .into())
}

fn multipart_error(err: MultipartError) -> HttpAppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(err.body_text()).into();
    }
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text())).into()
}

fn multipart_io_error(err: MultipartError) -> io::Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        io::Error::other(BodyLimitExceeded)
    } else {
        io::Error::other(err)
    }
}
