//! WebM preview clip generation.
//!
//! Short videos get one segment written straight to the final clip. Long
//! videos get three segments (start, middle, end) that are joined by stream
//! copy and then removed.

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::codec::CodecService;
use crate::command::FfmpegCommand;
use crate::concat;
use crate::error::MediaResult;
use crate::filters::fps_cover_scale;
use crate::fs_utils::{output_size_kb, remove_transient};
use vprev_models::encoding::{
    CLIP_END_OFFSET_SECS, CLIP_START_OFFSET_SECS, CLIP_VIDEO_BITRATE, CLIP_VIDEO_CODEC,
    LONG_VIDEO_THRESHOLD_SECS,
};
use vprev_models::{ArtifactKey, ArtifactKind, Resolution, SegmentPosition, VideoId};

/// Inputs for one preview clip.
#[derive(Debug, Clone)]
pub struct ClipRequest<'a> {
    pub input: &'a Path,
    pub video_id: &'a VideoId,
    pub output_dir: &'a Path,
    pub duration: f64,
    pub fps: u32,
    pub resolution: Resolution,
    pub segment_length: u32,
}

/// One segment to cut from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedSegment {
    /// `Clip` for the single-segment case, `ClipSegment` otherwise
    pub kind: ArtifactKind,
    pub start: f64,
}

/// Clamp a nominal start so the segment ends inside the video.
///
/// When the video is shorter than one segment the start is 0.
pub fn clamp_start(nominal: f64, duration: f64, segment_length: f64) -> f64 {
    nominal.min(duration - segment_length).max(0.0)
}

/// Segment starts for a video of `duration` seconds.
pub fn plan_clip_segments(duration: f64, segment_length: u32) -> Vec<PlannedSegment> {
    let length = f64::from(segment_length);

    if duration <= LONG_VIDEO_THRESHOLD_SECS {
        return vec![PlannedSegment {
            kind: ArtifactKind::Clip,
            start: clamp_start(duration * 0.5, duration, length),
        }];
    }

    SegmentPosition::ALL
        .iter()
        .map(|&position| {
            let nominal = match position {
                SegmentPosition::Start => CLIP_START_OFFSET_SECS,
                SegmentPosition::Middle => duration * 0.5,
                SegmentPosition::End => duration - CLIP_END_OFFSET_SECS,
            };
            PlannedSegment {
                kind: ArtifactKind::ClipSegment(position),
                start: clamp_start(nominal, duration, length),
            }
        })
        .collect()
}

/// Produce `<id>.webm` in the request's output directory.
///
/// A failed segment aborts before any merge. A failed merge leaves the
/// segments on disk.
pub async fn generate_clip<C>(codec: &C, req: &ClipRequest<'_>) -> MediaResult<PathBuf>
where
    C: CodecService + ?Sized,
{
    let final_path = req.output_dir.join(ArtifactKey::clip(req.video_id).file_name());
    let filter = fps_cover_scale(req.fps, req.resolution);
    let plan = plan_clip_segments(req.duration, req.segment_length);

    let mut segment_paths = Vec::with_capacity(plan.len());
    for segment in &plan {
        let path = req
            .output_dir
            .join(ArtifactKey::new(req.video_id.clone(), segment.kind).file_name());

        let cmd = FfmpegCommand::new(req.input, &path)
            .seek(segment.start)
            .duration(f64::from(req.segment_length))
            .video_filter(&filter)
            .video_codec(CLIP_VIDEO_CODEC)
            .video_bitrate(CLIP_VIDEO_BITRATE)
            .no_audio();

        if let Err(e) = codec.run(&cmd).await {
            error!(
                video_id = %req.video_id,
                segment = segment.kind.label(),
                start = segment.start,
                error = %e,
                stderr = e.diagnostics().unwrap_or_default(),
                "Clip segment generation failed"
            );
            return Err(e);
        }
        segment_paths.push(path);
    }

    if plan.len() > 1 {
        if let Err(e) = concat::merge(codec, &segment_paths, &final_path).await {
            error!(
                video_id = %req.video_id,
                error = %e,
                stderr = e.diagnostics().unwrap_or_default(),
                "Clip merge failed, segments left in place"
            );
            return Err(e);
        }
        remove_transient(&segment_paths).await;
    }

    let size_kb = output_size_kb(&final_path).await?;
    info!(
        video_id = %req.video_id,
        segments = plan.len(),
        "Generated clip ({:.2} KB)",
        size_kb
    );
    Ok(final_path)
}
