//! Cache-state queries.
//!
//! An artifact is present iff its canonical path exists. There is no manifest.

use std::collections::HashSet;

use crate::layout::ArtifactLayout;
use vprev_models::ArtifactKey;

/// Answers whether an artifact is already present.
pub trait CacheState: Send + Sync {
    fn exists(&self, key: &ArtifactKey) -> bool;
}

impl CacheState for ArtifactLayout {
    fn exists(&self, key: &ArtifactKey) -> bool {
        self.path(key).is_file()
    }
}

/// In-memory cache state for planning without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryCache {
    present: HashSet<ArtifactKey>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_present(keys: impl IntoIterator<Item = ArtifactKey>) -> Self {
        Self {
            present: keys.into_iter().collect(),
        }
    }
}

impl CacheState for MemoryCache {
    fn exists(&self, key: &ArtifactKey) -> bool {
        self.present.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vprev_models::VideoId;

    #[test]
    fn test_layout_exists() {
        let root = tempfile::TempDir::new().unwrap();
        let layout = ArtifactLayout::new(root.path().join("t"), root.path().join("g"));
        layout.ensure_dirs().unwrap();
        let id = VideoId::from("a");

        assert!(!layout.exists(&ArtifactKey::still(&id)));
        std::fs::write(layout.path(&ArtifactKey::still(&id)), b"jpg").unwrap();
        assert!(layout.exists(&ArtifactKey::still(&id)));
        assert!(!layout.exists(&ArtifactKey::clip(&id)));
    }

    #[test]
    fn test_memory_cache() {
        let id = VideoId::from("a");
        let cache = MemoryCache::with_present([ArtifactKey::still(&id)]);
        assert!(cache.exists(&ArtifactKey::still(&id)));
        assert!(!cache.exists(&ArtifactKey::gif(&id)));
    }
}
