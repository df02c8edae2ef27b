//! Video identity and probed video records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::resolution::Resolution;

/// Identifier of a source video: its file stem.
///
/// Two videos with the same stem in different subdirectories map to the same
/// identifier; the inventory keeps only the first one in path order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Derive the identifier from a video path (file stem).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .map(|stem| Self(stem.to_string_lossy().into_owned()))
            .filter(|id| !id.0.is_empty())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A source video with its probed properties, valid for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: VideoId,
    pub path: PathBuf,
    /// Duration in seconds
    pub duration: f64,
    /// Source resolution as reported by the probe
    pub resolution: Resolution,
}

impl VideoRecord {
    /// Whether the video is long enough to get the three-segment clip.
    pub fn is_long(&self) -> bool {
        self.duration > crate::encoding::LONG_VIDEO_THRESHOLD_SECS
    }
}
