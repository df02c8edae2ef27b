//! Canonical artifact paths and public URLs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageResult;
use vprev_models::{ArtifactDir, ArtifactKey};

/// Subdirectory of the thumbnail root holding stills and clips.
pub const PREVIEW_SUBDIR: &str = "preview";

/// Where artifacts live on disk and how they are addressed publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    thumbs_dir: PathBuf,
    gif_dir: PathBuf,
    thumbnail_url_prefix: String,
    gif_url_prefix: String,
}

impl ArtifactLayout {
    pub fn new(thumbs_dir: impl Into<PathBuf>, gif_dir: impl Into<PathBuf>) -> Self {
        Self {
            thumbs_dir: thumbs_dir.into(),
            gif_dir: gif_dir.into(),
            thumbnail_url_prefix: "/thumbnails".to_string(),
            gif_url_prefix: "/gifs".to_string(),
        }
    }

    /// Override the public URL prefixes. Trailing slashes are dropped.
    pub fn with_url_prefixes(
        mut self,
        thumbnail_prefix: impl Into<String>,
        gif_prefix: impl Into<String>,
    ) -> Self {
        self.thumbnail_url_prefix = thumbnail_prefix.into().trim_end_matches('/').to_string();
        self.gif_url_prefix = gif_prefix.into().trim_end_matches('/').to_string();
        self
    }

    pub fn thumbs_dir(&self) -> &Path {
        &self.thumbs_dir
    }

    pub fn gif_dir(&self) -> &Path {
        &self.gif_dir
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.thumbs_dir.join(PREVIEW_SUBDIR)
    }

    pub fn dir(&self, dir: ArtifactDir) -> PathBuf {
        match dir {
            ArtifactDir::Preview => self.preview_dir(),
            ArtifactDir::Gif => self.gif_dir.clone(),
        }
    }

    /// Canonical on-disk path of an artifact.
    pub fn path(&self, key: &ArtifactKey) -> PathBuf {
        self.dir(key.kind.dir()).join(key.file_name())
    }

    /// Public URL of an artifact.
    pub fn url(&self, key: &ArtifactKey) -> String {
        match key.kind.dir() {
            ArtifactDir::Preview => format!(
                "{}/{}/{}",
                self.thumbnail_url_prefix,
                PREVIEW_SUBDIR,
                key.file_name()
            ),
            ArtifactDir::Gif => format!("{}/{}", self.gif_url_prefix, key.file_name()),
        }
    }

    /// Create the artifact directories if missing.
    pub fn ensure_dirs(&self) -> StorageResult<()> {
        fs::create_dir_all(self.preview_dir())?;
        fs::create_dir_all(&self.gif_dir)?;
        Ok(())
    }
}
