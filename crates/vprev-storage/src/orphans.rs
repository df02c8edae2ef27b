//! Orphan artifact cleanup.

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::layout::ArtifactLayout;
use vprev_models::{candidate_owners, ArtifactDir, VideoId};

/// Outcome of one cleanup pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanReport {
    pub removed: usize,
    pub failed: usize,
}

/// Delete artifacts none of whose candidate owners is in `live`.
///
/// Only top-level files of the preview and GIF directories are considered.
/// Per-file failures are logged and counted, never returned.
pub fn cleanup_orphans(layout: &ArtifactLayout, live: &HashSet<VideoId>) -> OrphanReport {
    let mut report = OrphanReport::default();
    for dir in [ArtifactDir::Preview, ArtifactDir::Gif] {
        sweep_dir(&layout.dir(dir), dir, live, &mut report);
    }
    info!(
        removed = report.removed,
        failed = report.failed,
        "Orphan artifact cleanup finished"
    );
    report
}

fn sweep_dir(path: &Path, dir: ArtifactDir, live: &HashSet<VideoId>, report: &mut OrphanReport) {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), "Cannot list artifact directory: {}", e);
            return;
        }
    };

    for entry in entries.flatten() {
        let file = entry.path();
        if !file.is_file() {
            continue;
        }
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if candidate_owners(stem, dir).iter().any(|id| live.contains(id)) {
            continue;
        }
        match fs::remove_file(&file) {
            Ok(()) => {
                info!(path = %file.display(), "Removed orphan artifact");
                report.removed += 1;
            }
            Err(e) => {
                warn!(path = %file.display(), "Failed to remove orphan artifact: {}", e);
                report.failed += 1;
            }
        }
    }
}
