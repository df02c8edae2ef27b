//! ML service request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MlResult;

/// Request for zero-shot classification of one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Base64-encoded image bytes
    pub image: String,
    /// Labels to score the image against
    pub candidate_labels: Vec<String>,
    /// Model identifier understood by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Confidence of one candidate label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    /// Confidence in [0, 1]
    pub score: f64,
}

/// Response from classification: one score per label, unranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub scores: Vec<LabelScore>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
}

/// Scores an image against free-form labels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ZeroShotScorer: Send + Sync {
    /// Whether the backing model is ready to score.
    async fn health_check(&self) -> MlResult<bool>;

    /// One score per label, in no particular order.
    async fn score(&self, image: &[u8], labels: &[String]) -> MlResult<Vec<LabelScore>>;
}
