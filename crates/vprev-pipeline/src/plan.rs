//! Per-video work planning.
//!
//! Pure decisions over the cache state and the tag index; the coordinator
//! carries them out.

use std::collections::HashSet;
use std::fmt;

use vprev_models::encoding::MIN_VIDEO_DURATION_SECS;
use vprev_models::{gif_media_id, ArtifactKey, RunConfiguration, VideoRecord};
use vprev_storage::CacheState;

/// What to do with one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Not requested this run
    Skip,
    /// Already on disk
    Reuse,
    /// Must be produced
    Generate,
}

impl Step {
    fn for_artifact(requested: bool, cache: &dyn CacheState, key: &ArtifactKey) -> Self {
        if !requested {
            Step::Skip
        } else if cache.exists(key) {
            Step::Reuse
        } else {
            Step::Generate
        }
    }

    pub fn is_generate(&self) -> bool {
        matches!(self, Step::Generate)
    }
}

/// Why a video gets no work at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    TooShort { duration: f64 },
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::TooShort { .. } => "too_short",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooShort { duration } => write!(
                f,
                "duration {:.2}s below {}s",
                duration, MIN_VIDEO_DURATION_SECS
            ),
        }
    }
}

/// Decisions for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoPlan {
    pub still: Step,
    pub clip: Step,
    pub gif: Step,
    /// Tag the still under the GIF's media id after a fresh GIF
    pub tag_gif: bool,
    /// Tag the still under the video's own id
    pub tag_video: bool,
}

/// Decide the work for `record`.
///
/// A GIF already listed in `tagged` counts as present even when its file is
/// gone. Video tagging needs a still, either on disk or produced this run.
pub fn plan_video(
    record: &VideoRecord,
    config: &RunConfiguration,
    cache: &dyn CacheState,
    tagged: &HashSet<String>,
) -> Result<VideoPlan, SkipReason> {
    if record.duration < MIN_VIDEO_DURATION_SECS {
        return Err(SkipReason::TooShort {
            duration: record.duration,
        });
    }

    let id = &record.id;
    let still_key = ArtifactKey::still(id);
    let still = Step::for_artifact(config.generate_thumbs, cache, &still_key);
    let clip = Step::for_artifact(config.generate_thumbs, cache, &ArtifactKey::clip(id));

    let gif = if config.generate_gifs && tagged.contains(&gif_media_id(id)) {
        Step::Reuse
    } else {
        Step::for_artifact(config.generate_gifs, cache, &ArtifactKey::gif(id))
    };

    let still_available = still != Step::Skip || cache.exists(&still_key);
    let tag_gif = config.generate_tags && gif.is_generate();
    let tag_video = config.generate_tags && still_available && !tagged.contains(id.as_str());

    Ok(VideoPlan {
        still,
        clip,
        gif,
        tag_gif,
        tag_video,
    })
}
