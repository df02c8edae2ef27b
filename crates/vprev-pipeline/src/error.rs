//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] vprev_models::ConfigError),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Cache clear failed: {0}")]
    CacheClear(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Storage error: {0}")]
    Storage(#[from] vprev_storage::StorageError),

    #[error("Media error: {0}")]
    Media(#[from] vprev_media::MediaError),

    #[error("ML error: {0}")]
    Ml(#[from] vprev_ml_client::MlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    pub fn cache_clear(msg: impl Into<String>) -> Self {
        Self::CacheClear(msg.into())
    }

    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
