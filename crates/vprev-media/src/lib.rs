#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for preview artifact generation.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A codec service seam (`CodecService`) with the CLI runner as default
//! - FFprobe video information
//! - The three artifact generators: still frame, clip, looping GIF

pub mod clip;
pub mod codec;
pub mod command;
pub mod concat;
pub mod error;
pub mod filters;
pub mod fs_utils;
pub mod gif;
pub mod probe;
pub mod thumbnail;

#[cfg(test)]
pub(crate) mod testing;

pub use clip::{clamp_start, generate_clip, plan_clip_segments, ClipRequest, PlannedSegment};
pub use codec::{CodecService, FfmpegRunner};
pub use command::FfmpegCommand;
pub use error::{MediaError, MediaResult};
pub use gif::{generate_gif, GifRequest};
pub use probe::{probe_video, VideoInfo};
pub use thumbnail::{generate_still, still_timestamp, StillRequest};
