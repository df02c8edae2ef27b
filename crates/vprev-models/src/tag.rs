//! Tag index entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::video::VideoId;

/// Prefix that namespaces GIF entries away from their source video's entry.
pub const GIF_MEDIA_PREFIX: &str = "gif_";

/// Media id of the GIF derived from `video_id`.
pub fn gif_media_id(video_id: &VideoId) -> String {
    format!("{}{}", GIF_MEDIA_PREFIX, video_id)
}

/// Kind of media a tag entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Video,
    Gif,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Gif => "gif",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "video" => Ok(MediaType::Video),
            "gif" => Ok(MediaType::Gif),
            other => Err(format!("unknown media type: {}", other)),
        }
    }
}

/// One row of the tag table: labels in rank order, most confident first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub media_id: String,
    pub media_type: MediaType,
    pub tags: Vec<String>,
}

impl TagEntry {
    /// Entry for a source video.
    pub fn video(video_id: &VideoId, tags: Vec<String>) -> Self {
        Self {
            media_id: video_id.to_string(),
            media_type: MediaType::Video,
            tags,
        }
    }

    /// Entry for the GIF derived from a source video.
    pub fn gif(video_id: &VideoId, tags: Vec<String>) -> Self {
        Self {
            media_id: gif_media_id(video_id),
            media_type: MediaType::Gif,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gif_entry_is_namespaced() {
        let id = VideoId::from("b");
        let video = TagEntry::video(&id, vec!["cat".into()]);
        let gif = TagEntry::gif(&id, vec!["cat".into()]);
        assert_eq!(video.media_id, "b");
        assert_eq!(gif.media_id, "gif_b");
        assert_ne!(video.media_id, gif.media_id);
    }

    #[test]
    fn test_media_type_round_trip() {
        assert_eq!("gif".parse::<MediaType>(), Ok(MediaType::Gif));
        assert_eq!(MediaType::Video.to_string(), "video");
        assert!("image".parse::<MediaType>().is_err());
    }
}
