//! Batch preview and tagging pipeline.
//!
//! This crate provides:
//! - Environment configuration
//! - Run logging and counters
//! - Interactive run configuration
//! - Stale process cleanup
//! - Per-video planning and the cache coordinator

pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod plan;
pub mod processes;
pub mod prompt;

pub use config::PipelineConfig;
pub use coordinator::{Coordinator, PreviewUrls, RunSummary};
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use plan::{plan_video, SkipReason, Step, VideoPlan};
pub use prompt::{ConfigFrontend, FixedConfig, InteractivePrompt};
