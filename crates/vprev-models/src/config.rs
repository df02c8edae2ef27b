//! Run configuration collected once at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::resolution::Resolution;

/// Default clip frame rate.
pub const DEFAULT_FPS: u32 = 20;
/// Default clip/still width; height follows 16:9.
pub const DEFAULT_WIDTH: u32 = 480;
/// Allowed clip/still width range.
pub const MIN_WIDTH: u32 = 320;
pub const MAX_WIDTH: u32 = 480;
/// Default clip segment length in seconds.
pub const DEFAULT_SEGMENT_LENGTH: u32 = 2;
/// Allowed clip segment length range in seconds.
pub const MIN_SEGMENT_LENGTH: u32 = 1;
pub const MAX_SEGMENT_LENGTH: u32 = 20;
/// Default number of tags kept per media item.
pub const DEFAULT_TAGS_PER_ITEM: usize = 15;

/// Errors raised while validating configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("FPS must be greater than zero")]
    InvalidFps,

    #[error("Resolution width {0} outside 320..=480")]
    WidthOutOfRange(u32),

    #[error("Segment length {0}s outside 1..=20")]
    SegmentLengthOutOfRange(u32),

    #[error("Tag count must be greater than zero")]
    InvalidTagCount,

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Invalid tag persistence strategy: {0}")]
    InvalidTagPersistence(String),
}

/// How new tag entries reach the tag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagPersistence {
    /// Append each entry as soon as it is produced.
    #[default]
    Append,
    /// Accumulate entries in memory and rewrite the table once at the end.
    Rewrite,
}

impl TagPersistence {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagPersistence::Append => "append",
            TagPersistence::Rewrite => "rewrite",
        }
    }
}

impl fmt::Display for TagPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TagPersistence {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(TagPersistence::Append),
            "rewrite" => Ok(TagPersistence::Rewrite),
            other => Err(ConfigError::InvalidTagPersistence(other.to_string())),
        }
    }
}

/// Validated options for a single pipeline run.
///
/// Built through [`RunConfigurationBuilder`], so every instance satisfies the
/// value ranges below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfiguration {
    pub generate_thumbs: bool,
    pub generate_gifs: bool,
    pub generate_tags: bool,
    pub clear_cache: bool,
    /// Clip frame rate, > 0
    pub fps: u32,
    /// Still/clip target resolution, width in [320, 480]
    pub target_resolution: Resolution,
    /// Clip segment length in seconds, in [1, 20]
    pub segment_length_seconds: u32,
    /// Maximum tags per media item, > 0
    pub tags_per_item: usize,
}

impl RunConfiguration {
    pub fn builder() -> RunConfigurationBuilder {
        RunConfigurationBuilder::default()
    }

    /// Whether any generation step is enabled.
    pub fn has_work(&self) -> bool {
        self.generate_thumbs || self.generate_gifs || self.generate_tags
    }
}

impl fmt::Display for RunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "thumbs={} gifs={} tags={} clear_cache={} fps={} resolution={} segment_length={}s tags_per_item={}",
            self.generate_thumbs,
            self.generate_gifs,
            self.generate_tags,
            self.clear_cache,
            self.fps,
            self.target_resolution,
            self.segment_length_seconds,
            self.tags_per_item
        )
    }
}

/// Builder that validates every field once in [`RunConfigurationBuilder::build`].
#[derive(Debug, Clone)]
pub struct RunConfigurationBuilder {
    generate_thumbs: bool,
    generate_gifs: bool,
    generate_tags: bool,
    clear_cache: bool,
    fps: u32,
    width: u32,
    segment_length_seconds: u32,
    tags_per_item: usize,
}

impl Default for RunConfigurationBuilder {
    fn default() -> Self {
        Self {
            generate_thumbs: false,
            generate_gifs: false,
            generate_tags: false,
            clear_cache: false,
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            segment_length_seconds: DEFAULT_SEGMENT_LENGTH,
            tags_per_item: DEFAULT_TAGS_PER_ITEM,
        }
    }
}

impl RunConfigurationBuilder {
    pub fn generate_thumbs(mut self, enabled: bool) -> Self {
        self.generate_thumbs = enabled;
        self
    }

    pub fn generate_gifs(mut self, enabled: bool) -> Self {
        self.generate_gifs = enabled;
        self
    }

    pub fn generate_tags(mut self, enabled: bool) -> Self {
        self.generate_tags = enabled;
        self
    }

    pub fn clear_cache(mut self, enabled: bool) -> Self {
        self.clear_cache = enabled;
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the target width; the height is derived as 16:9.
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn segment_length_seconds(mut self, seconds: u32) -> Self {
        self.segment_length_seconds = seconds;
        self
    }

    pub fn tags_per_item(mut self, count: usize) -> Self {
        self.tags_per_item = count;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<RunConfiguration, ConfigError> {
        validate_fps(self.fps)?;
        validate_width(self.width)?;
        validate_segment_length(self.segment_length_seconds)?;
        validate_tag_count(self.tags_per_item)?;

        Ok(RunConfiguration {
            generate_thumbs: self.generate_thumbs,
            generate_gifs: self.generate_gifs,
            generate_tags: self.generate_tags,
            clear_cache: self.clear_cache,
            fps: self.fps,
            target_resolution: Resolution::widescreen(self.width),
            segment_length_seconds: self.segment_length_seconds,
            tags_per_item: self.tags_per_item,
        })
    }
}

pub fn validate_fps(fps: u32) -> Result<(), ConfigError> {
    if fps == 0 {
        return Err(ConfigError::InvalidFps);
    }
    Ok(())
}

pub fn validate_width(width: u32) -> Result<(), ConfigError> {
    if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
        return Err(ConfigError::WidthOutOfRange(width));
    }
    Ok(())
}

pub fn validate_segment_length(seconds: u32) -> Result<(), ConfigError> {
    if !(MIN_SEGMENT_LENGTH..=MAX_SEGMENT_LENGTH).contains(&seconds) {
        return Err(ConfigError::SegmentLengthOutOfRange(seconds));
    }
    Ok(())
}

pub fn validate_tag_count(count: usize) -> Result<(), ConfigError> {
    if count == 0 {
        return Err(ConfigError::InvalidTagCount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfiguration::builder().build().unwrap();
        assert_eq!(config.fps, 20);
        assert_eq!(config.target_resolution, Resolution::new(480, 270));
        assert_eq!(config.segment_length_seconds, 2);
        assert_eq!(config.tags_per_item, 15);
        assert!(!config.has_work());
    }

    #[test]
    fn test_any_step_counts_as_work() {
        assert!(RunConfiguration::builder().generate_tags(true).build().unwrap().has_work());
        assert!(RunConfiguration::builder().generate_gifs(true).build().unwrap().has_work());
        assert!(!RunConfiguration::builder().clear_cache(true).build().unwrap().has_work());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert_eq!(
            RunConfiguration::builder().fps(0).build(),
            Err(ConfigError::InvalidFps)
        );
        assert_eq!(
            RunConfiguration::builder().width(319).build(),
            Err(ConfigError::WidthOutOfRange(319))
        );
        assert_eq!(
            RunConfiguration::builder().width(481).build(),
            Err(ConfigError::WidthOutOfRange(481))
        );
        assert_eq!(
            RunConfiguration::builder().segment_length_seconds(21).build(),
            Err(ConfigError::SegmentLengthOutOfRange(21))
        );
        assert_eq!(
            RunConfiguration::builder().segment_length_seconds(0).build(),
            Err(ConfigError::SegmentLengthOutOfRange(0))
        );
        assert_eq!(
            RunConfiguration::builder().tags_per_item(0).build(),
            Err(ConfigError::InvalidTagCount)
        );
    }

    #[test]
    fn test_width_bounds_inclusive() {
        let config = RunConfiguration::builder().width(320).build().unwrap();
        assert_eq!(config.target_resolution, Resolution::new(320, 180));
        assert!(RunConfiguration::builder().width(480).build().is_ok());
    }

    #[test]
    fn test_tag_persistence_parse() {
        assert_eq!("append".parse::<TagPersistence>(), Ok(TagPersistence::Append));
        assert_eq!(" Rewrite ".parse::<TagPersistence>(), Ok(TagPersistence::Rewrite));
        assert!("both".parse::<TagPersistence>().is_err());
    }
}
