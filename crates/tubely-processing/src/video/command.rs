use anyhow::{anyhow, Result};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tubely_core::AppError;

/// Reject tool paths carrying shell metacharacters or traversal sequences.
pub(crate) fn validate_tool_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(anyhow!("Tool path is empty"));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

/// Run `command` to completion, killing the child if it outlives `timeout` or the caller is dropped.
pub(crate) async fn run_with_timeout(
    tool: &str,
    mut command: Command,
    timeout: Duration,
) -> Result<Output, AppError> {
    command.kill_on_drop(true);

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(AppError::MediaProcessing(format!(
            "Failed to execute {}: {}",
            tool, e
        ))),
        Err(_) => Err(AppError::MediaProcessing(format!(
            "{} timed out after {}s",
            tool,
            timeout.as_secs()
        ))),
    }
}

/// Log a failed run's stderr and turn the exit status into an error.
pub(crate) fn check_status(tool: &str, output: &Output) -> Result<(), AppError> {
    if output.status.success() {
        return Ok(());
    }

    tracing::warn!(
        tool = tool,
        status = %output.status,
        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
        "Media tool exited unsuccessfully"
    );
    Err(AppError::MediaProcessing(format!(
        "{} failed with {}",
        tool, output.status
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tool_path() {
        assert!(validate_tool_path("ffprobe").is_ok());
        assert!(validate_tool_path("/usr/local/bin/ffmpeg").is_ok());
        assert!(validate_tool_path("ffmpeg; rm -rf /").is_err());
        assert!(validate_tool_path("../bin/ffmpeg").is_err());
        assert!(validate_tool_path("  ").is_err());
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let mut command = Command::new("sleep");
        command.arg("5");
        let err = run_with_timeout("sleep", command, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MediaProcessing(ref msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_missing_binary_is_processing_error() {
        let command = Command::new("/nonexistent/tubely-tool");
        let err = run_with_timeout("tubely-tool", command, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.is_io_failure());
    }
}
