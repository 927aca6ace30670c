use std::fmt;
use std::io;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::AppError;

use crate::scratch::ScratchFile;

/// Marker carried inside an `io::Error` by body readers that hit the transport's size limit.
#[derive(Debug)]
pub struct BodyLimitExceeded;

impl fmt::Display for BodyLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request body exceeds the configured limit")
    }
}

impl std::error::Error for BodyLimitExceeded {}

fn too_large(max_bytes: u64) -> AppError {
    AppError::PayloadTooLarge(format!(
        "Video exceeds the maximum upload size of {} MB",
        max_bytes / (1024 * 1024)
    ))
}

/// Copy `body` into a new scratch file in `dir`, flushed and synced to disk.
///
/// At most `max_bytes` are accepted. The write handle is closed before
/// returning, so later stages open the file by path. The returned guard
/// removes the file when dropped; on error the file is already gone.
pub async fn stage_upload<R>(body: R, dir: &Path, max_bytes: u64) -> Result<ScratchFile, AppError>
where
    R: AsyncRead + Unpin,
{
    let (scratch, file) = ScratchFile::create_in(dir, ".mp4")
        .map_err(|e| AppError::io("Failed to create staged upload", e))?;
    let mut file = tokio::fs::File::from_std(file);

    let mut limited = body.take(max_bytes.saturating_add(1));
    let copied = match tokio::io::copy(&mut limited, &mut file).await {
        Ok(copied) => copied,
        Err(e) if is_body_limit(&e) => return Err(too_large(max_bytes)),
        Err(e) => return Err(AppError::io("Failed to write staged upload", e)),
    };

    if copied > max_bytes {
        return Err(too_large(max_bytes));
    }

    file.flush()
        .await
        .map_err(|e| AppError::io("Failed to flush staged upload", e))?;
    file.sync_all()
        .await
        .map_err(|e| AppError::io("Failed to sync staged upload", e))?;

    tracing::debug!(
        path = %scratch.path().display(),
        size_bytes = copied,
        "Upload staged"
    );

    Ok(scratch)
}

fn is_body_limit(err: &io::Error) -> bool {
    err.get_ref()
        .map(|inner| inner.is::<BodyLimitExceeded>())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;
    use tubely_core::ErrorMetadata;

    struct ErrorReader(fn() -> io::Error);

    impl AsyncRead for ErrorReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err((self.0)()))
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_stage_upload_writes_body() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage_upload(&b"fake mp4"[..], dir.path(), 1024)
            .await
            .unwrap();

        let mut reopened = tokio::fs::File::open(staged.path()).await.unwrap();
        let mut content = Vec::new();
        reopened.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"fake mp4");

        drop(reopened);
        drop(staged);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let body = vec![0u8; 2048];
        let err = stage_upload(&body[..], dir.path(), 1024).await.unwrap_err();

        assert_eq!(err.http_status_code(), 413);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_body_exactly_at_limit_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let body = vec![7u8; 1024];
        let staged = stage_upload(&body[..], dir.path(), 1024).await.unwrap();
        assert_eq!(std::fs::metadata(staged.path()).unwrap().len(), 1024);
    }

    #[tokio::test]
    async fn test_read_failure_is_io_error_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let reader = ErrorReader(|| io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        let err = stage_upload(reader, dir.path(), 1024).await.unwrap_err();

        assert!(matches!(err, AppError::Io { .. }));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_transport_limit_maps_to_payload_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let reader = ErrorReader(|| io::Error::other(BodyLimitExceeded));
        let err = stage_upload(reader, dir.path(), 1024).await.unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert_eq!(entries(dir.path()), 0);
    }
}
