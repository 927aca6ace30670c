//! Scoped temporary files.

use std::io;
use std::path::{Path, PathBuf};

use tubely_core::constants::SCRATCH_FILE_PREFIX;

/// A file on local disk that is removed when the guard is dropped.
///
/// Removal runs on every exit path, including early returns and cancelled
/// request futures. A failed removal is logged at `warn` and never surfaces
/// as an error.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Create a uniquely named, empty file in `dir` and return its guard and an open handle.
    pub fn create_in(dir: &Path, suffix: &str) -> io::Result<(Self, std::fs::File)> {
        let named = tempfile::Builder::new()
            .prefix(SCRATCH_FILE_PREFIX)
            .suffix(suffix)
            .tempfile_in(dir)?;
        let (file, path) = named.keep().map_err(|e| e.error)?;
        Ok((Self { path }, file))
    }

    /// Take ownership of a path that may or may not exist yet.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        // A single unlink, done inline: the file is gone before the owner's future resolves.
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed scratch file");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove scratch file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_scratch_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let (scratch, mut file) = ScratchFile::create_in(dir.path(), ".mp4").unwrap();
            file.write_all(b"data").unwrap();
            let name = scratch.path().file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with(SCRATCH_FILE_PREFIX));
            assert!(name.ends_with(".mp4"));
            assert!(scratch.path().exists());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_adopted_missing_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-created.processing");
        drop(ScratchFile::adopt(&path));
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(ScratchFile::create_in(&missing, ".mp4").is_err());
    }
}
