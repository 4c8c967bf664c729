//! Best-effort scratch file removal.

use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Delete a file if it exists, swallowing every failure.
///
/// Cleanup of scratch artifacts must never fail the owning operation: a
/// missing file is a no-op and permission errors are only logged.
pub async fn remove_file_if_exists(path: impl AsRef<Path>) {
    let path = path.as_ref();

    match fs::remove_file(path).await {
        Ok(()) => debug!("Deleted scratch file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to delete scratch file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_removes_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("voice.mp3");
        fs::write(&path, b"audio").await.unwrap();

        remove_file_if_exists(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("never-created.mp3");

        // Deleting twice must not panic or error
        remove_file_if_exists(&path).await;
        remove_file_if_exists(&path).await;
    }
}
