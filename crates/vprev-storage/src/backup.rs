//! Cache clear with timestamped backup.
//!
//! Layout: `<backup root>/<YYYYmmdd_HHMMSS>/{thumbnails/, gifs/, tags.csv}`.

use chrono::{DateTime, TimeZone};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{StorageError, StorageResult};
use crate::layout::ArtifactLayout;

/// Sortable compact timestamp used as the backup folder name.
pub fn backup_stamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Back up all artifacts and the tag table, then delete them and recreate
/// empty artifact directories.
///
/// Only the artifact directories (`preview/` under the thumbnail root, and
/// the GIF directory) are touched; other files in the thumbnail root stay.
/// Nothing is deleted unless the backup completed. Any failure is returned
/// and should abort the run.
pub fn clear_cache(
    layout: &ArtifactLayout,
    tags_csv: &Path,
    backup_root: &Path,
    stamp: &str,
) -> StorageResult<PathBuf> {
    let target = backup_root.join(stamp);
    fs::create_dir_all(&target).map_err(|e| {
        StorageError::backup_failed(format!("cannot create {}: {}", target.display(), e))
    })?;

    let preview_dir = layout.preview_dir();
    copy_tree(&preview_dir, &target.join("thumbnails"))?;
    copy_tree(layout.gif_dir(), &target.join("gifs"))?;
    if tags_csv.is_file() {
        fs::copy(tags_csv, target.join("tags.csv")).map_err(|e| {
            StorageError::backup_failed(format!("cannot copy {}: {}", tags_csv.display(), e))
        })?;
    }
    info!(backup = %target.display(), "Backed up artifacts and tag table");

    remove_dir(&preview_dir)?;
    remove_dir(layout.gif_dir())?;
    match fs::remove_file(tags_csv) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(StorageError::delete_failed(format!(
                "{}: {}",
                tags_csv.display(),
                e
            )))
        }
    }

    layout.ensure_dirs()?;
    info!("Cleared artifact cache");
    Ok(target)
}

fn copy_tree(src: &Path, dst: &Path) -> StorageResult<()> {
    if !src.exists() {
        warn!(path = %src.display(), "Nothing to back up, directory missing");
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| StorageError::backup_failed(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| StorageError::backup_failed(e.to_string()))?;
        let out = dst.join(relative);

        let copied = if entry.file_type().is_dir() {
            fs::create_dir_all(&out)
        } else {
            fs::copy(entry.path(), &out).map(|_| ())
        };
        copied.map_err(|e| {
            StorageError::backup_failed(format!("{}: {}", entry.path().display(), e))
        })?;
    }
    Ok(())
}

fn remove_dir(path: &Path) -> StorageResult<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::delete_failed(format!(
            "{}: {}",
            path.display(),
            e
        ))),
    }
}
