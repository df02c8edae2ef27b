//! FFmpeg video filter definitions.

use vprev_models::Resolution;

/// Scale to cover the target box, preserving aspect ratio.
///
/// The output is at least the target size in both dimensions and every
/// dimension is even.
pub fn cover_scale(resolution: Resolution) -> String {
    format!(
        "scale={}:{}:force_original_aspect_ratio=increase:force_divisible_by=2",
        resolution.width, resolution.height
    )
}

/// Resample the frame rate, then cover-scale.
pub fn fps_cover_scale(fps: u32, resolution: Resolution) -> String {
    format!("fps={},{}", fps, cover_scale(resolution))
}
