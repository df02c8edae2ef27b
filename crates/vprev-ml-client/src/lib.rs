//! Client for the zero-shot image classification service.
//!
//! This crate provides:
//! - An HTTP client for the scoring service (`MlClient`)
//! - The `ZeroShotScorer` seam so the pipeline can run against a fake
//! - The classifier adapter that ranks and truncates labels for one image
//! - The candidate-label loader

pub mod classifier;
pub mod client;
pub mod error;
pub mod labels;
pub mod types;

pub use classifier::Classifier;
pub use client::{MlClient, MlClientConfig};
pub use error::{MlError, MlResult};
pub use labels::{load_candidate_labels, DEFAULT_LABELS, MAX_CANDIDATE_LABELS, MIN_TAG_COUNT};
pub use types::{ClassifyRequest, ClassifyResponse, HealthResponse, LabelScore, ZeroShotScorer};

#[cfg(test)]
pub use types::MockZeroShotScorer;
