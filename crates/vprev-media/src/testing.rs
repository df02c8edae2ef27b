//! In-process codec double for generator tests.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

use crate::codec::CodecService;
use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::probe::VideoInfo;

type FailWhen = Box<dyn Fn(&FfmpegCommand) -> bool + Send + Sync>;

/// Records every command and writes a small output file for each success.
pub(crate) struct RecordingCodec {
    calls: Mutex<Vec<FfmpegCommand>>,
    fail_when: Option<FailWhen>,
}

impl RecordingCodec {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_when: None,
        }
    }

    /// Fail commands whose output file name contains `needle`.
    pub fn failing_on(needle: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_when: Some(Box::new(move |cmd| {
                cmd.output().to_string_lossy().contains(needle)
            })),
        }
    }

    pub fn calls(&self) -> Vec<FfmpegCommand> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodecService for RecordingCodec {
    async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.calls.lock().unwrap().push(cmd.clone());
        if self.fail_when.as_ref().is_some_and(|f| f(cmd)) {
            return Err(MediaError::ffmpeg_failed(
                "injected failure",
                Some("boom".to_string()),
                Some(1),
            ));
        }
        std::fs::write(cmd.output(), b"artifact")?;
        Ok(())
    }

    async fn probe(&self, _path: &Path) -> MediaResult<VideoInfo> {
        Ok(VideoInfo {
            duration: 30.0,
            width: 1280,
            height: 720,
            fps: 30.0,
            codec: "h264".to_string(),
        })
    }
}
