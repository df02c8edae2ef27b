//! Codec service seam and the FFmpeg CLI runner.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::probe::{self, VideoInfo};

/// External transcoder used by the generators.
///
/// Each `run` either produces the command's output file or fails.
#[async_trait]
pub trait CodecService: Send + Sync {
    /// Execute a transcode command.
    async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()>;

    /// Read duration and dimensions of a video file.
    async fn probe(&self, path: &Path) -> MediaResult<VideoInfo>;
}

/// Runs `ffmpeg`/`ffprobe` binaries found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner;

impl FfmpegRunner {
    pub fn new() -> Self {
        Self
    }

    /// Check that both binaries are reachable.
    pub fn check_available() -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;
        which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CodecService for FfmpegRunner {
    async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                format!("FFmpeg exited with status {}", output.status),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
                output.status.code(),
            ))
        }
    }

    async fn probe(&self, path: &Path) -> MediaResult<VideoInfo> {
        probe::probe_video(path).await
    }
}
