//! ML service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::{MlError, MlResult};
use crate::types::{ClassifyRequest, ClassifyResponse, HealthResponse, LabelScore, ZeroShotScorer};

/// Configuration for ML client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of ML service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
    /// Model the service should score with
    pub model: Option<String>,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(300),
            max_retries: 2,
            model: Some("openai/clip-vit-base-patch32".to_string()),
        }
    }
}

impl MlClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("ML_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("ML_SERVICE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: std::env::var("ML_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            model: std::env::var("ML_MODEL").ok().or(defaults.model),
        }
    }
}

/// Client for the classification service.
pub struct MlClient {
    http: Client,
    config: MlClientConfig,
}

impl MlClient {
    /// Create a new ML client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(MlClientConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> MlResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = MlResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "ML request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(MlError::RequestFailed("Unknown error".to_string())))
    }
}

#[async_trait]
impl ZeroShotScorer for MlClient {
    async fn health_check(&self) -> MlResult<bool> {
        let url = self.url("health");

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                let status_ok = health.status == "healthy" || health.status == "ok";
                Ok(status_ok && health.model_loaded.unwrap_or(true))
            }
            Ok(response) => {
                warn!("ML service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("ML service health check error: {}", e);
                Ok(false)
            }
        }
    }

    async fn score(&self, image: &[u8], labels: &[String]) -> MlResult<Vec<LabelScore>> {
        let url = self.url("classify");
        let request = ClassifyRequest {
            image: STANDARD.encode(image),
            candidate_labels: labels.to_vec(),
            model: self.config.model.clone(),
        };

        debug!(labels = labels.len(), "Sending classification request to {}", url);

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(MlError::Network)?;
                if response.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Err(MlError::ServiceUnavailable(format!(
                        "{} returned 503",
                        url
                    )));
                }
                Ok(response)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MlError::RequestFailed(format!(
                "ML service returned {}: {}",
                status, body
            )));
        }

        let body: ClassifyResponse = response.json().await?;
        if let Some(bad) = body
            .scores
            .iter()
            .find(|s| !s.score.is_finite() || !(0.0..=1.0).contains(&s.score))
        {
            return Err(MlError::InvalidResponse(format!(
                "confidence {} for '{}' outside [0, 1]",
                bad.score, bad.label
            )));
        }
        Ok(body.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MlClient {
        MlClient::new(MlClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
            model: None,
        })
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = MlClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.max_retries, 2);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "ok", "model_loaded": true})),
            )
            .mount(&server)
            .await;

        assert!(client_for(&server).health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_check_unreachable_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!client_for(&server).health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_score_sends_base64_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .and(body_partial_json(serde_json::json!({
                "image": STANDARD.encode(b"jpeg-bytes"),
                "candidate_labels": ["cat", "dog"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "scores": [
                    {"label": "dog", "score": 0.2},
                    {"label": "cat", "score": 0.8}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let labels = vec!["cat".to_string(), "dog".to_string()];
        let scores = client_for(&server)
            .score(b"jpeg-bytes", &labels)
            .await
            .unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[1].label, "cat");
    }

    #[tokio::test]
    async fn test_score_rejects_out_of_range_confidence() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "scores": [{"label": "cat", "score": 1.5}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .score(b"x", &["cat".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MlError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_score_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad image"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .score(b"x", &["cat".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MlError::RequestFailed(_)));
    }
}
