//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`; any `AppError` (or type that
//! converts into one) renders as a status code plus an [`ErrorResponse`] body.
//! The body never carries error details on its own; outside production the
//! router adds [`expose_error_details`], which swaps in the detailed body for
//! errors that are safe to describe.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            error_type: None,
            code: code.into(),
            recoverable: false,
            suggested_action: None,
        }
    }
}

/// Wrapper so `AppError` (defined in tubely-core) can implement axum's `IntoResponse`.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                cause = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

/// Detailed error body attached to a response as an extension; see [`expose_error_details`].
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub ErrorResponse);

/// Replace the body of any error response carrying [`ErrorDetails`] with the detailed one.
pub async fn expose_error_details(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let Some(ErrorDetails(detailed)) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };

    let bytes = match serde_json::to_vec(&detailed) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize error details");
            return response;
        }
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse {
            error: app_error.client_message(),
            details: None,
            error_type: None,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        // IO-class failures never get a detailed body, in any environment.
        let details = (!app_error.is_sensitive()).then(|| {
            ErrorDetails(ErrorResponse {
                details: Some(app_error.detailed_message()),
                error_type: Some(app_error.error_type().to_string()),
                ..body.clone()
            })
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(details) = details {
            response.extensions_mut().insert(details);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_forbidden_renders_403_with_code() {
        let response = HttpAppError(AppError::Forbidden(
            "You are not the owner of this video".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["recoverable"], false);
    }

    #[tokio::test]
    async fn test_io_class_error_hides_cause() {
        let err = AppError::MediaProcessing("ffprobe failed with exit status: 1".to_string());
        let response = HttpAppError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "MEDIA_PROCESSING_ERROR");
        assert!(body.get("details").is_none());
        assert!(!body.to_string().contains("ffprobe"));
    }

    #[tokio::test]
    async fn test_body_is_redacted_and_details_ride_as_extension() {
        let response =
            HttpAppError(AppError::BadRequest("Invalid video ID".to_string())).into_response();

        let ErrorDetails(detailed) = response.extensions().get::<ErrorDetails>().cloned().unwrap();
        assert_eq!(detailed.code, "BAD_REQUEST");
        assert!(detailed.details.unwrap().contains("Invalid video ID"));

        let body = body_json(response).await;
        assert!(body.get("details").is_none());
        assert!(body.get("error_type").is_none());
    }

    #[tokio::test]
    async fn test_sensitive_error_carries_no_details_extension() {
        let response =
            HttpAppError(AppError::MediaProcessing("ffmpeg exited 1".to_string())).into_response();
        assert!(response.extensions().get::<ErrorDetails>().is_none());
    }

    #[tokio::test]
    async fn test_storage_not_found_maps_to_404() {
        let response = HttpAppError::from(StorageError::NotFound("k".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
