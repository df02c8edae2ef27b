//! Classifier adapter: rank candidate labels for one image.

use std::cmp::Ordering;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{MlError, MlResult};
use crate::types::{LabelScore, ZeroShotScorer};

/// A loaded zero-shot classifier.
///
/// Holds the scorer for the duration of a run. Tagging never fails: any
/// error yields an empty label list.
pub struct Classifier {
    scorer: Box<dyn ZeroShotScorer>,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier").finish_non_exhaustive()
    }
}

impl Classifier {
    /// Wrap a scorer after checking it is ready.
    pub async fn load(scorer: Box<dyn ZeroShotScorer>) -> MlResult<Self> {
        if !scorer.health_check().await? {
            return Err(MlError::ServiceUnavailable(
                "classifier model is not ready".to_string(),
            ));
        }
        info!("Classifier loaded");
        Ok(Self { scorer })
    }

    /// Up to `k` labels for the image, most confident first.
    pub async fn tag(&self, image_path: &Path, labels: &[String], k: usize) -> Vec<String> {
        if labels.is_empty() || k == 0 {
            return Vec::new();
        }
        match self.try_tag(image_path, labels, k).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!(path = %image_path.display(), "Tagging failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_tag(&self, image_path: &Path, labels: &[String], k: usize) -> MlResult<Vec<String>> {
        let bytes = tokio::fs::read(image_path).await?;
        image::load_from_memory(&bytes).map_err(|e| MlError::InvalidImage(e.to_string()))?;

        let scores = self.scorer.score(&bytes, labels).await?;
        Ok(rank_labels(scores, k))
    }
}

/// Sort by descending confidence, keeping scorer order on ties, and keep `k`.
pub fn rank_labels(mut scores: Vec<LabelScore>, k: usize) -> Vec<String> {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scores.into_iter().take(k).map(|s| s.label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MockZeroShotScorer;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn score(label: &str, score: f64) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    fn write_jpeg(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("a_thumb.jpg");
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([10, 20, 30]));
        img.save(&path).unwrap();
        path
    }

    fn labels() -> Vec<String> {
        ["cat", "dog", "car"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let ranked = rank_labels(
            vec![score("a", 0.2), score("b", 0.5), score("c", 0.2), score("d", 0.1)],
            3,
        );
        assert_eq!(ranked, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_load_requires_healthy_scorer() {
        let mut scorer = MockZeroShotScorer::new();
        scorer.expect_health_check().returning(|| Ok(false));
        assert!(Classifier::load(Box::new(scorer)).await.is_err());
    }

    #[tokio::test]
    async fn test_tag_ranks_and_truncates() {
        let dir = TempDir::new().unwrap();
        let image = write_jpeg(&dir);

        let mut scorer = MockZeroShotScorer::new();
        scorer.expect_health_check().returning(|| Ok(true));
        scorer.expect_score().times(1).returning(|_, _| {
            Ok(vec![score("cat", 0.1), score("dog", 0.7), score("car", 0.2)])
        });

        let classifier = Classifier::load(Box::new(scorer)).await.unwrap();
        let tags = classifier.tag(&image, &labels(), 2).await;
        assert_eq!(tags, vec!["dog", "car"]);
    }

    #[tokio::test]
    async fn test_undecodable_image_yields_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let mut scorer = MockZeroShotScorer::new();
        scorer.expect_health_check().returning(|| Ok(true));
        scorer.expect_score().never();

        let classifier = Classifier::load(Box::new(scorer)).await.unwrap();
        assert!(classifier.tag(&path, &labels(), 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_scorer_failure_yields_empty() {
        let dir = TempDir::new().unwrap();
        let image = write_jpeg(&dir);

        let mut scorer = MockZeroShotScorer::new();
        scorer.expect_health_check().returning(|| Ok(true));
        scorer
            .expect_score()
            .returning(|_, _| Err(MlError::RequestFailed("down".to_string())));

        let classifier = Classifier::load(Box::new(scorer)).await.unwrap();
        assert!(classifier.tag(&image, &labels(), 5).await.is_empty());
    }
}
