//! Artifact keys and canonical artifact file names.
//!
//! Every derived file is named from its owning video's identifier, so the
//! owner can be recovered from a file name during orphan cleanup.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::video::VideoId;

/// Suffix of still-frame file stems.
pub const STILL_SUFFIX: &str = "_thumb";

/// Position of a transient clip segment in a long video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPosition {
    Start,
    Middle,
    End,
}

impl SegmentPosition {
    /// All positions in merge order.
    pub const ALL: [SegmentPosition; 3] = [
        SegmentPosition::Start,
        SegmentPosition::Middle,
        SegmentPosition::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentPosition::Start => "start",
            SegmentPosition::Middle => "middle",
            SegmentPosition::End => "end",
        }
    }
}

impl fmt::Display for SegmentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directory an artifact lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactDir {
    /// Stills and clips
    Preview,
    /// GIFs and their transient segments
    Gif,
}

/// Kind of derived file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// JPEG still frame
    Still,
    /// Final WebM clip (single segment or merged)
    Clip,
    /// Transient WebM segment of a long video
    ClipSegment(SegmentPosition),
    /// Final looping GIF
    Gif,
    /// Transient one-second GIF segment
    GifSegment(u8),
}

impl ArtifactKind {
    pub fn dir(&self) -> ArtifactDir {
        match self {
            ArtifactKind::Still | ArtifactKind::Clip | ArtifactKind::ClipSegment(_) => {
                ArtifactDir::Preview
            }
            ArtifactKind::Gif | ArtifactKind::GifSegment(_) => ArtifactDir::Gif,
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Still => "still",
            ArtifactKind::Clip => "clip",
            ArtifactKind::ClipSegment(_) => "clip_segment",
            ArtifactKind::Gif => "gif",
            ArtifactKind::GifSegment(_) => "gif_segment",
        }
    }
}

/// A derived file identified by owner and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub video_id: VideoId,
    pub kind: ArtifactKind,
}

impl ArtifactKey {
    pub fn new(video_id: VideoId, kind: ArtifactKind) -> Self {
        Self { video_id, kind }
    }

    pub fn still(video_id: &VideoId) -> Self {
        Self::new(video_id.clone(), ArtifactKind::Still)
    }

    pub fn clip(video_id: &VideoId) -> Self {
        Self::new(video_id.clone(), ArtifactKind::Clip)
    }

    pub fn gif(video_id: &VideoId) -> Self {
        Self::new(video_id.clone(), ArtifactKind::Gif)
    }

    /// Canonical file name inside the artifact's directory.
    pub fn file_name(&self) -> String {
        let id = self.video_id.as_str();
        match self.kind {
            ArtifactKind::Still => format!("{}{}.jpg", id, STILL_SUFFIX),
            ArtifactKind::Clip => format!("{}.webm", id),
            ArtifactKind::ClipSegment(position) => format!("{}_{}.webm", id, position),
            ArtifactKind::Gif => format!("{}.gif", id),
            ArtifactKind::GifSegment(index) => format!("{}_segment_{}.gif", id, index),
        }
    }
}

/// Identifiers that may own an artifact file stem, full stem first.
///
/// A preview stem can be a final clip of a video whose own id ends in a known
/// suffix (`race_start.webm`) or a derived file of the shorter id (`race`), so
/// both readings are returned and the file is kept if any of them is live.
/// GIF files are owned by their full stem, so leftover GIF segments never
/// match a live video and are swept as orphans.
pub fn candidate_owners(file_stem: &str, dir: ArtifactDir) -> Vec<VideoId> {
    let mut owners = vec![VideoId::from(file_stem)];
    if dir == ArtifactDir::Preview {
        let suffixes = [STILL_SUFFIX, "_start", "_middle", "_end"];
        owners.extend(
            suffixes
                .iter()
                .filter_map(|suffix| file_stem.strip_suffix(suffix))
                .filter(|owner| !owner.is_empty())
                .map(VideoId::from),
        );
    }
    owners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let id = VideoId::from("c");
        assert_eq!(ArtifactKey::still(&id).file_name(), "c_thumb.jpg");
        assert_eq!(ArtifactKey::clip(&id).file_name(), "c.webm");
        assert_eq!(
            ArtifactKey::new(id.clone(), ArtifactKind::ClipSegment(SegmentPosition::Middle))
                .file_name(),
            "c_middle.webm"
        );
        assert_eq!(ArtifactKey::gif(&id).file_name(), "c.gif");
        assert_eq!(
            ArtifactKey::new(id, ArtifactKind::GifSegment(3)).file_name(),
            "c_segment_3.gif"
        );
    }

    fn owners(stem: &str, dir: ArtifactDir) -> Vec<String> {
        candidate_owners(stem, dir)
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    #[test]
    fn test_preview_owners_include_stem_and_stripped_forms() {
        assert_eq!(owners("clip_thumb", ArtifactDir::Preview), ["clip_thumb", "clip"]);
        assert_eq!(owners("clip_end", ArtifactDir::Preview), ["clip_end", "clip"]);
        assert_eq!(owners("clip", ArtifactDir::Preview), ["clip"]);
        assert_eq!(
            owners("race_start_thumb", ArtifactDir::Preview),
            ["race_start_thumb", "race_start"]
        );
        assert_eq!(owners("_thumb", ArtifactDir::Preview), ["_thumb"]);
    }

    #[test]
    fn test_gif_owner_is_full_stem() {
        assert_eq!(owners("clip", ArtifactDir::Gif), ["clip"]);
        assert_eq!(owners("clip_segment_0", ArtifactDir::Gif), ["clip_segment_0"]);
        assert_eq!(owners("race_start", ArtifactDir::Gif), ["race_start"]);
    }

    #[test]
    fn test_kind_dirs() {
        assert_eq!(ArtifactKind::Still.dir(), ArtifactDir::Preview);
        assert_eq!(ArtifactKind::GifSegment(0).dir(), ArtifactDir::Gif);
    }
}
