//! Pipeline configuration.

use std::path::PathBuf;

use vprev_models::TagPersistence;
use vprev_storage::ArtifactLayout;

/// Paths, URL prefixes and run-wide switches.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root scanned for source videos
    pub video_dir: PathBuf,
    /// Thumbnail root; stills and clips go to its `preview/` subdirectory
    pub thumbs_dir: PathBuf,
    /// GIF output directory
    pub gif_dir: PathBuf,
    /// Tag index table
    pub tags_csv: PathBuf,
    /// Candidate tag table
    pub input_tags: PathBuf,
    /// Excluded tag names
    pub exclusions: PathBuf,
    /// Public URL prefix for stills and clips
    pub thumbnail_url_prefix: String,
    /// Public URL prefix for GIFs
    pub gif_url_prefix: String,
    /// Root of timestamped cache backups
    pub backup_dir: PathBuf,
    /// How tag entries are persisted
    pub tag_persistence: TagPersistence,
    /// Terminate stale transcoder processes at startup
    pub process_cleanup: bool,
    /// Plain-text log file
    pub log_file: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            video_dir: PathBuf::from("../public/videos"),
            thumbs_dir: PathBuf::from("../public/thumbnails"),
            gif_dir: PathBuf::from("../public/gifs"),
            tags_csv: PathBuf::from("scripts/tags/tags.csv"),
            input_tags: PathBuf::from("../public/selected_tags.csv"),
            exclusions: PathBuf::from("../public/exclusions.csv"),
            thumbnail_url_prefix: "/thumbnails".to_string(),
            gif_url_prefix: "/gifs".to_string(),
            backup_dir: PathBuf::from("backup"),
            tag_persistence: TagPersistence::Append,
            process_cleanup: true,
            log_file: PathBuf::from("media_processing.log"),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            video_dir: env_path("VIDEO_DIR").unwrap_or(defaults.video_dir),
            thumbs_dir: env_path("THUMBS_DIR").unwrap_or(defaults.thumbs_dir),
            gif_dir: env_path("GIF_DIR").unwrap_or(defaults.gif_dir),
            tags_csv: env_path("TAGS_CSV").unwrap_or(defaults.tags_csv),
            input_tags: env_path("INPUT_TAGS").unwrap_or(defaults.input_tags),
            exclusions: env_path("EXCLUSIONS").unwrap_or(defaults.exclusions),
            thumbnail_url_prefix: std::env::var("THUMBNAIL_URL_PREFIX")
                .unwrap_or(defaults.thumbnail_url_prefix),
            gif_url_prefix: std::env::var("GIF_URL_PREFIX").unwrap_or(defaults.gif_url_prefix),
            backup_dir: env_path("BACKUP_DIR").unwrap_or(defaults.backup_dir),
            tag_persistence: std::env::var("TAG_PERSISTENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.tag_persistence),
            process_cleanup: std::env::var("PROCESS_CLEANUP")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.process_cleanup),
            log_file: env_path("LOG_FILE").unwrap_or(defaults.log_file),
        }
    }

    /// Artifact layout for the configured directories and prefixes.
    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.thumbs_dir, &self.gif_dir)
            .with_url_prefixes(&self.thumbnail_url_prefix, &self.gif_url_prefix)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vprev_models::{ArtifactKey, VideoId};

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.video_dir, PathBuf::from("../public/videos"));
        assert_eq!(config.tags_csv, PathBuf::from("scripts/tags/tags.csv"));
        assert_eq!(config.tag_persistence, TagPersistence::Append);
        assert!(config.process_cleanup);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_layout_uses_prefixes() {
        let config = PipelineConfig {
            thumbnail_url_prefix: "/t".to_string(),
            ..PipelineConfig::default()
        };
        let id = VideoId::from("a");
        assert_eq!(
            config.layout().url(&ArtifactKey::still(&id)),
            "/t/preview/a_thumb.jpg"
        );
    }
}
