//! Atomic file writes.

use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// Write `bytes` to `path` atomically.
///
/// The payload goes to a temp file in the destination directory first and
/// is renamed into place, so a crash mid-write never leaves a partial file
/// at `path`. Intermediate directories are created as needed.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> ExportResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ExportError::write_failed(parent, e))?;
        }
    }

    // Same-directory temp file, so the rename stays on one filesystem.
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)
        .await
        .map_err(|e| ExportError::write_failed(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| ExportError::write_failed(path, e))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_dirs_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/route.geojson");

        write_atomic(&path, b"{}").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.csv");

        write_atomic(&path, b"old").await.unwrap();
        write_atomic(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
