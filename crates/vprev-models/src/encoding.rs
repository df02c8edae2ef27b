//! Encoding constants shared by the artifact generators.

use crate::resolution::Resolution;

/// Videos shorter than this are skipped entirely (seconds).
pub const MIN_VIDEO_DURATION_SECS: f64 = 5.0;

/// Videos longer than this get a three-segment merged clip (seconds).
pub const LONG_VIDEO_THRESHOLD_SECS: f64 = 60.0;

/// Still frame position as a fraction of the duration.
pub const STILL_POSITION_RATIO: f64 = 0.1;
/// JPEG quality scale for stills and GIF segments (ffmpeg `-q:v`).
pub const STILL_QUALITY: u8 = 6;

/// Nominal start of the first long-video segment (seconds).
pub const CLIP_START_OFFSET_SECS: f64 = 10.0;
/// Nominal distance of the last long-video segment from the end (seconds).
pub const CLIP_END_OFFSET_SECS: f64 = 20.0;
/// Clip video codec
pub const CLIP_VIDEO_CODEC: &str = "libvpx-vp9";
/// Clip video bitrate
pub const CLIP_VIDEO_BITRATE: &str = "1M";

/// Number of one-second GIF segments.
pub const GIF_SEGMENT_COUNT: u8 = 5;
/// GIF segment length (seconds).
pub const GIF_SEGMENT_SECS: f64 = 1.0;
/// GIF frame rate
pub const GIF_FPS: u32 = 20;
/// GIF cover-scale target
pub const GIF_RESOLUTION: Resolution = Resolution::new(854, 480);
