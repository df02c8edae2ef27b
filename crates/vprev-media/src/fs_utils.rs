//! Filesystem helpers for generated files.

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Size of a produced file in kilobytes.
///
/// Fails if the file is missing, so a zero-exit transcode that wrote
/// nothing is still reported as a failure.
pub async fn output_size_kb(path: &Path) -> MediaResult<f64> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.len() as f64 / 1024.0),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(MediaError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Best-effort removal of intermediate files.
///
/// Missing files are ignored; other failures are logged and skipped.
pub async fn remove_transient<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path).await {
            Ok(()) => tracing::debug!("Removed intermediate file {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove intermediate file {}: {}",
                path.display(),
                e
            ),
        }
    }
}
