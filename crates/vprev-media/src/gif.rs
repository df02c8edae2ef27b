//! Looping GIF generation.

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::codec::CodecService;
use crate::command::FfmpegCommand;
use crate::concat;
use crate::error::{MediaError, MediaResult};
use crate::filters::fps_cover_scale;
use crate::fs_utils::{output_size_kb, remove_transient};
use vprev_models::encoding::{
    GIF_FPS, GIF_RESOLUTION, GIF_SEGMENT_COUNT, GIF_SEGMENT_SECS, MIN_VIDEO_DURATION_SECS,
    STILL_QUALITY,
};
use vprev_models::{ArtifactKey, ArtifactKind, VideoId};

/// Inputs for one looping GIF.
#[derive(Debug, Clone)]
pub struct GifRequest<'a> {
    pub input: &'a Path,
    pub video_id: &'a VideoId,
    pub output_dir: &'a Path,
    pub duration: f64,
}

/// Produce `<id>.gif` from five one-second segments at offsets 0..5.
///
/// Segment files are removed whether or not the merge succeeds.
pub async fn generate_gif<C>(codec: &C, req: &GifRequest<'_>) -> MediaResult<PathBuf>
where
    C: CodecService + ?Sized,
{
    if req.duration < MIN_VIDEO_DURATION_SECS {
        warn!(
            video_id = %req.video_id,
            duration = req.duration,
            "Video too short for GIF"
        );
        return Err(MediaError::too_short(req.duration, MIN_VIDEO_DURATION_SECS));
    }

    let segments: Vec<PathBuf> = (0..GIF_SEGMENT_COUNT)
        .map(|i| {
            req.output_dir
                .join(ArtifactKey::new(req.video_id.clone(), ArtifactKind::GifSegment(i)).file_name())
        })
        .collect();
    let output = req.output_dir.join(ArtifactKey::gif(req.video_id).file_name());

    let result = render_and_merge(codec, req, &segments, &output).await;
    remove_transient(&segments).await;

    if let Err(e) = &result {
        error!(
            video_id = %req.video_id,
            error = %e,
            stderr = e.diagnostics().unwrap_or_default(),
            "GIF generation failed"
        );
        return result;
    }

    let size_kb = output_size_kb(&output).await?;
    info!(video_id = %req.video_id, "Generated GIF ({:.2} KB)", size_kb);
    result
}

async fn render_and_merge<C>(
    codec: &C,
    req: &GifRequest<'_>,
    segments: &[PathBuf],
    output: &Path,
) -> MediaResult<PathBuf>
where
    C: CodecService + ?Sized,
{
    let filter = fps_cover_scale(GIF_FPS, GIF_RESOLUTION);

    for (offset, segment) in segments.iter().enumerate() {
        let cmd = FfmpegCommand::new(req.input, segment)
            .seek(offset as f64 * GIF_SEGMENT_SECS)
            .duration(GIF_SEGMENT_SECS)
            .video_filter(&filter)
            .quality(STILL_QUALITY);
        codec.run(&cmd).await?;
    }

    concat::merge(codec, segments, output).await?;
    Ok(output.to_path_buf())
}
