//! Source video inventory.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use vprev_models::VideoId;

/// Extensions picked up by the scan, compared case-insensitively.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm"];

/// A source video found on disk, before probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceVideo {
    pub id: VideoId,
    pub path: PathBuf,
}

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Recursively list source videos under `root`, sorted by path.
///
/// Never fails: an unreadable root yields an empty list and unreadable
/// entries are skipped. When two files share a stem only the first one in
/// path order is kept.
pub fn scan_videos(root: &Path) -> Vec<SourceVideo> {
    if !root.is_dir() {
        error!(path = %root.display(), "Video directory does not exist or is not a directory");
        return Vec::new();
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry during video scan: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_video_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut seen: HashMap<VideoId, PathBuf> = HashMap::new();
    let mut videos = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(id) = VideoId::from_path(&path) else {
            warn!(path = %path.display(), "Skipping video with unusable file name");
            continue;
        };
        if let Some(first) = seen.get(&id) {
            warn!(
                video_id = %id,
                kept = %first.display(),
                skipped = %path.display(),
                "Duplicate video identifier, keeping first"
            );
            continue;
        }
        seen.insert(id.clone(), path.clone());
        videos.push(SourceVideo { id, path });
    }

    info!(count = videos.len(), root = %root.display(), "Scanned source videos");
    videos
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"v").unwrap();
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("b.mp4"));
        touch(&root.path().join("a.WEBM"));
        touch(&root.path().join("nested/c.mp4"));
        touch(&root.path().join("notes.txt"));
        touch(&root.path().join("d.mov"));

        let ids: Vec<String> = scan_videos(root.path())
            .into_iter()
            .map(|v| v.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let root = TempDir::new().unwrap();
        assert!(scan_videos(&root.path().join("missing")).is_empty());
    }

    #[test]
    fn test_duplicate_stems_keep_first() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("x/clip.mp4"));
        touch(&root.path().join("y/clip.webm"));

        let videos = scan_videos(root.path());
        assert_eq!(videos.len(), 1);
        assert!(videos[0].path.ends_with("x/clip.mp4"));
    }
}
