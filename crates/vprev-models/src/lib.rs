//! Shared data models for the video preview pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Video identity and probed video records
//! - Output resolutions and run configuration
//! - Artifact keys and canonical artifact file names
//! - Tag index entries
//! - Encoding constants shared by the generators

pub mod artifact;
pub mod config;
pub mod encoding;
pub mod resolution;
pub mod tag;
pub mod video;

// Re-export common types
pub use artifact::{candidate_owners, ArtifactDir, ArtifactKey, ArtifactKind, SegmentPosition};
pub use config::{ConfigError, RunConfiguration, RunConfigurationBuilder, TagPersistence};
pub use resolution::Resolution;
pub use tag::{gif_media_id, MediaType, TagEntry, GIF_MEDIA_PREFIX};
pub use video::{VideoId, VideoRecord};
