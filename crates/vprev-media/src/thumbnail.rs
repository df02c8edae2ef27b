//! Still-frame generation.

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::codec::CodecService;
use crate::command::FfmpegCommand;
use crate::error::MediaResult;
use crate::filters::cover_scale;
use crate::fs_utils::output_size_kb;
use vprev_models::encoding::{STILL_POSITION_RATIO, STILL_QUALITY};
use vprev_models::{ArtifactKey, Resolution, VideoId};

/// Inputs for one still frame.
#[derive(Debug, Clone)]
pub struct StillRequest<'a> {
    pub input: &'a Path,
    pub video_id: &'a VideoId,
    pub output_dir: &'a Path,
    pub duration: f64,
    pub resolution: Resolution,
}

/// Timestamp of the still frame: 10% into the video, clamped to `[0, duration]`.
pub fn still_timestamp(duration: f64) -> f64 {
    let duration = duration.max(0.0);
    (duration * STILL_POSITION_RATIO).clamp(0.0, duration)
}

/// Capture one JPEG frame, cover-scaled to the target resolution.
pub async fn generate_still<C>(codec: &C, req: &StillRequest<'_>) -> MediaResult<PathBuf>
where
    C: CodecService + ?Sized,
{
    let output = req
        .output_dir
        .join(ArtifactKey::still(req.video_id).file_name());

    let cmd = FfmpegCommand::new(req.input, &output)
        .seek(still_timestamp(req.duration))
        .single_frame()
        .video_filter(cover_scale(req.resolution))
        .quality(STILL_QUALITY);

    if let Err(e) = codec.run(&cmd).await {
        error!(
            video_id = %req.video_id,
            error = %e,
            stderr = e.diagnostics().unwrap_or_default(),
            "Still frame generation failed"
        );
        return Err(e);
    }

    let size_kb = output_size_kb(&output).await?;
    info!(video_id = %req.video_id, "Generated still frame ({:.2} KB)", size_kb);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingCodec;
    use tempfile::TempDir;

    #[test]
    fn test_still_timestamp() {
        assert!((still_timestamp(100.0) - 10.0).abs() < 1e-9);
        assert!((still_timestamp(7.0) - 0.7).abs() < 1e-9);
        assert_eq!(still_timestamp(0.0), 0.0);
    }

    #[tokio::test]
    async fn test_generate_still() {
        let dir = TempDir::new().unwrap();
        let codec = RecordingCodec::new();
        let id = VideoId::from("a");
        let req = StillRequest {
            input: Path::new("a.mp4"),
            video_id: &id,
            output_dir: dir.path(),
            duration: 50.0,
            resolution: Resolution::new(480, 270),
        };

        let out = generate_still(&codec, &req).await.unwrap();
        assert_eq!(out, dir.path().join("a_thumb.jpg"));

        let args = codec.calls()[0].build_args().join(" ");
        assert!(args.contains("-ss 5.000"));
        assert!(args.contains("-vframes 1"));
        assert!(args.contains("-q:v 6"));
        assert!(args.contains("scale=480:270:force_original_aspect_ratio=increase"));
    }

    #[tokio::test]
    async fn test_generate_still_failure() {
        let dir = TempDir::new().unwrap();
        let codec = RecordingCodec::failing_on("_thumb");
        let id = VideoId::from("a");
        let req = StillRequest {
            input: Path::new("a.mp4"),
            video_id: &id,
            output_dir: dir.path(),
            duration: 50.0,
            resolution: Resolution::new(480, 270),
        };

        assert!(generate_still(&codec, &req).await.is_err());
        assert!(!dir.path().join("a_thumb.jpg").exists());
    }
}
