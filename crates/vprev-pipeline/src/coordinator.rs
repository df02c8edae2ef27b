//! Cache coordinator.
//!
//! Drives one run: process cleanup, configuration, optional cache clear,
//! classifier load, orphan cleanup, the per-video loop and the final tag
//! prune. Nothing inside the per-video loop aborts the run.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Local;
use serde::Serialize;
use tracing::{debug, error, info, warn, Instrument};

use vprev_media::{
    generate_clip, generate_gif, generate_still, ClipRequest, CodecService, GifRequest,
    StillRequest,
};
use vprev_ml_client::{load_candidate_labels, Classifier, ZeroShotScorer};
use vprev_models::{
    gif_media_id, ArtifactKey, RunConfiguration, TagEntry, TagPersistence, VideoId, VideoRecord,
};
use vprev_storage::{
    backup_stamp, cleanup_orphans, clear_cache, prune_entries, scan_videos, ArtifactLayout,
    CacheState, SourceVideo, TagIndex,
};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::plan::{plan_video, SkipReason, Step, VideoPlan};
use crate::processes::cleanup_stale_processes;
use crate::prompt::ConfigFrontend;

/// Outcome counts of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    /// Videos whose requested steps all succeeded
    pub processed: usize,
    /// Videos in the inventory
    pub total: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed: Duration,
    /// Artifact URLs of each processed video, in inventory order
    pub previews: Vec<PreviewUrls>,
}

/// Public URLs of one processed video's artifacts.
///
/// `None` when the artifact was not requested this run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewUrls {
    pub video_id: String,
    pub still: Option<String>,
    pub clip: Option<String>,
    pub gif: Option<String>,
}

/// How one video ended.
#[derive(Debug)]
enum VideoOutcome {
    Processed(PreviewUrls),
    Skipped(SkipReason),
    Failed(&'static str),
}

/// Per-run state built after configuration is collected.
struct RunState {
    config: RunConfiguration,
    index: TagIndex,
    /// Media ids with an entry in the tag index
    tagged: HashSet<String>,
    /// Full table, kept only when persisting by rewrite
    entries: Vec<TagEntry>,
    /// False when the existing table could not be read; it is then left untouched
    index_readable: bool,
    classifier: Option<Classifier>,
    labels: Vec<String>,
}

/// Orchestrates one pipeline run against the configured directories.
pub struct Coordinator {
    settings: PipelineConfig,
    layout: ArtifactLayout,
    codec: Box<dyn CodecService>,
    scorer: Option<Box<dyn ZeroShotScorer>>,
    logger: RunLogger,
}

impl Coordinator {
    pub fn new(
        settings: PipelineConfig,
        codec: Box<dyn CodecService>,
        scorer: Box<dyn ZeroShotScorer>,
    ) -> Self {
        let layout = settings.layout();
        Self {
            settings,
            layout,
            codec,
            scorer: Some(scorer),
            logger: RunLogger::new("media_processing"),
        }
    }

    /// Execute the run. Only configuration, cache clear and directory setup
    /// failures are returned; everything else is logged and counted.
    pub async fn run(mut self, frontend: &dyn ConfigFrontend) -> PipelineResult<RunSummary> {
        let span = self.logger.create_span();
        self.execute(frontend).instrument(span).await
    }

    async fn execute(&mut self, frontend: &dyn ConfigFrontend) -> PipelineResult<RunSummary> {
        let started = Instant::now();
        self.logger.log_start("media processing");

        if self.settings.process_cleanup {
            let dirs = [self.layout.thumbs_dir(), self.layout.gif_dir()];
            cleanup_stale_processes(&dirs).await;
        }

        let config = frontend.collect()?;
        info!(config = %config, "Run configuration");

        if config.clear_cache {
            self.clear_artifacts()?;
        }

        self.layout.ensure_dirs()?;
        if let Some(parent) = self.settings.tags_csv.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), "Cannot create tag index directory: {}", e);
                }
            }
        }

        let videos = scan_videos(&self.settings.video_dir);
        let mut summary = RunSummary {
            run_id: self.logger.run_id().to_string(),
            total: videos.len(),
            ..RunSummary::default()
        };
        if videos.is_empty() {
            self.logger
                .log_warning("No videos found, skipping orphan cleanup and tag pruning");
            summary.elapsed = started.elapsed();
            return Ok(summary);
        }

        let mut state = self.prepare_run(config).await;

        if !state.config.clear_cache {
            let live: HashSet<VideoId> = videos.iter().map(|v| v.id.clone()).collect();
            cleanup_orphans(&self.layout, &live);
        }

        for (i, video) in videos.iter().enumerate() {
            info!(
                video_id = %video.id,
                path = %video.path.display(),
                "Processing video {}/{}",
                i + 1,
                videos.len()
            );
            match self.process_video(&mut state, video).await {
                VideoOutcome::Processed(urls) => {
                    metrics::record_video_processed();
                    summary.processed += 1;
                    summary.previews.push(urls);
                }
                VideoOutcome::Skipped(reason) => {
                    warn!(video_id = %video.id, "Skipping video: {}", reason);
                    metrics::record_video_skipped(reason.label());
                    summary.skipped += 1;
                }
                VideoOutcome::Failed(stage) => {
                    warn!(video_id = %video.id, stage, "Video failed, moving on");
                    metrics::record_video_failed(stage);
                    summary.failed += 1;
                }
            }
        }

        self.prune_tags(&mut state, &videos);

        // Teardown
        if state.classifier.take().is_some() {
            debug!("Released classifier");
        }
        summary.elapsed = started.elapsed();
        self.logger.log_completion(&format!(
            "processed {}/{} videos ({} skipped, {} failed) in {:.2}s",
            summary.processed,
            summary.total,
            summary.skipped,
            summary.failed,
            summary.elapsed.as_secs_f64()
        ));
        Ok(summary)
    }

    fn clear_artifacts(&self) -> PipelineResult<()> {
        self.logger.log_progress("Clearing cache");
        let stamp = backup_stamp(&Local::now());
        match clear_cache(
            &self.layout,
            &self.settings.tags_csv,
            &self.settings.backup_dir,
            &stamp,
        ) {
            Ok(backup) => {
                info!(backup = %backup.display(), "Cleared cache");
                Ok(())
            }
            Err(e) => {
                self.logger.log_error(&format!("Failed to clear cache: {}", e));
                Err(PipelineError::cache_clear(e.to_string()))
            }
        }
    }

    /// Load the tag index and, when tagging, the classifier and labels.
    async fn prepare_run(&mut self, config: RunConfiguration) -> RunState {
        let index = TagIndex::new(&self.settings.tags_csv, config.tags_per_item);
        let (entries, index_readable) = match index.load() {
            Ok(entries) => (entries, true),
            Err(e) => {
                error!(path = %index.path().display(), "Cannot read tag index: {}", e);
                (Vec::new(), false)
            }
        };
        let tagged = entries.iter().map(|e| e.media_id.clone()).collect();

        let mut classifier = None;
        let mut labels = Vec::new();
        if config.generate_tags {
            if let Some(scorer) = self.scorer.take() {
                match Classifier::load(scorer).await {
                    Ok(loaded) => classifier = Some(loaded),
                    Err(e) => {
                        self.logger
                            .log_error(&format!("Failed to load classifier: {}", e));
                        self.logger.log_warning("Continuing without tags");
                    }
                }
            }
            labels = load_candidate_labels(&self.settings.input_tags, &self.settings.exclusions);
        }

        let entries = match self.settings.tag_persistence {
            TagPersistence::Rewrite => entries,
            TagPersistence::Append => Vec::new(),
        };

        RunState {
            config,
            index,
            tagged,
            entries,
            index_readable,
            classifier,
            labels,
        }
    }

    async fn process_video(&self, state: &mut RunState, video: &SourceVideo) -> VideoOutcome {
        let info = match self.codec.probe(&video.path).await {
            Ok(info) => info,
            Err(e) => {
                error!(video_id = %video.id, "Probe failed: {}", e);
                return VideoOutcome::Failed("probe");
            }
        };
        let record = VideoRecord {
            id: video.id.clone(),
            path: video.path.clone(),
            duration: info.duration,
            resolution: info.resolution(),
        };

        let plan = match plan_video(&record, &state.config, &self.layout, &state.tagged) {
            Ok(plan) => plan,
            Err(reason) => return VideoOutcome::Skipped(reason),
        };

        let mut urls = match self.produce_previews(&record, &state.config, &plan).await {
            Ok(urls) => urls,
            Err(stage) => return VideoOutcome::Failed(stage),
        };

        if plan.gif.is_generate() {
            let req = GifRequest {
                input: &record.path,
                video_id: &record.id,
                output_dir: self.layout.gif_dir(),
                duration: record.duration,
            };
            if generate_gif(self.codec.as_ref(), &req).await.is_err() {
                return VideoOutcome::Failed("gif");
            }
            metrics::record_artifact_generated("gif");

            if plan.tag_gif {
                let tags = self.tag_still(state, &record.id).await;
                if tags.is_empty() {
                    warn!(video_id = %record.id, "No tags generated for GIF");
                } else {
                    self.record_entry(state, TagEntry::gif(&record.id, tags));
                }
            }
        } else if plan.gif == Step::Reuse {
            debug!(video_id = %record.id, "GIF already present");
        }
        urls.gif = self.published_url(plan.gif, ArtifactKey::gif(&record.id));

        if plan.tag_video && state.classifier.is_some() {
            let tags = self.tag_still(state, &record.id).await;
            if tags.is_empty() {
                warn!(video_id = %record.id, "No tags generated for video");
            } else {
                self.record_entry(state, TagEntry::video(&record.id, tags));
            }
        }

        info!(
            video_id = %record.id,
            still_url = urls.still.as_deref().unwrap_or_default(),
            clip_url = urls.clip.as_deref().unwrap_or_default(),
            gif_url = urls.gif.as_deref().unwrap_or_default(),
            "Processed video"
        );
        VideoOutcome::Processed(urls)
    }

    /// Still then clip. Any failure ends the video.
    async fn produce_previews(
        &self,
        record: &VideoRecord,
        config: &RunConfiguration,
        plan: &VideoPlan,
    ) -> Result<PreviewUrls, &'static str> {
        let preview_dir = self.layout.preview_dir();

        if plan.still.is_generate() {
            let req = StillRequest {
                input: &record.path,
                video_id: &record.id,
                output_dir: &preview_dir,
                duration: record.duration,
                resolution: config.target_resolution,
            };
            if generate_still(self.codec.as_ref(), &req).await.is_err() {
                return Err("still");
            }
            metrics::record_artifact_generated("still");
        }

        if plan.clip.is_generate() {
            let req = ClipRequest {
                input: &record.path,
                video_id: &record.id,
                output_dir: &preview_dir,
                duration: record.duration,
                fps: config.fps,
                resolution: config.target_resolution,
                segment_length: config.segment_length_seconds,
            };
            if generate_clip(self.codec.as_ref(), &req).await.is_err() {
                return Err("clip");
            }
            metrics::record_artifact_generated("clip");
        }

        Ok(PreviewUrls {
            video_id: record.id.to_string(),
            still: self.published_url(plan.still, ArtifactKey::still(&record.id)),
            clip: self.published_url(plan.clip, ArtifactKey::clip(&record.id)),
            gif: None,
        })
    }

    /// URL of an artifact that is on disk after its step ran.
    fn published_url(&self, step: Step, key: ArtifactKey) -> Option<String> {
        match step {
            Step::Skip => None,
            Step::Reuse | Step::Generate => Some(self.layout.url(&key)),
        }
    }

    /// Tag the video's still, if a classifier is loaded and the still exists.
    async fn tag_still(&self, state: &RunState, video_id: &VideoId) -> Vec<String> {
        let Some(classifier) = state.classifier.as_ref() else {
            return Vec::new();
        };
        let still = ArtifactKey::still(video_id);
        if !self.layout.exists(&still) {
            warn!(video_id = %video_id, "No still frame to tag");
            return Vec::new();
        }
        classifier
            .tag(
                &self.layout.path(&still),
                &state.labels,
                state.config.tags_per_item,
            )
            .await
    }

    fn record_entry(&self, state: &mut RunState, entry: TagEntry) {
        if state.tagged.contains(&entry.media_id) {
            debug!(media_id = %entry.media_id, "Tag entry already present");
            return;
        }

        match self.settings.tag_persistence {
            TagPersistence::Append => {
                if let Err(e) = state.index.append(&entry) {
                    error!(media_id = %entry.media_id, "Failed to append tag entry: {}", e);
                    return;
                }
            }
            TagPersistence::Rewrite if !state.index_readable => {
                warn!(
                    media_id = %entry.media_id,
                    path = %state.index.path().display(),
                    "Tag index is unreadable, tags not persisted"
                );
                return;
            }
            TagPersistence::Rewrite => state.entries.push(entry.clone()),
        }

        info!(
            media_id = %entry.media_id,
            media_type = %entry.media_type,
            tags = %entry.tags.join(", "),
            "Recorded tags"
        );
        metrics::record_tag_entry(entry.media_type.as_str());
        state.tagged.insert(entry.media_id);
    }

    /// Drop tag entries for media that no longer exist.
    fn prune_tags(&self, state: &mut RunState, videos: &[SourceVideo]) {
        if !state.index_readable {
            warn!("Tag index was unreadable at startup, skipping tag pruning");
            return;
        }

        let mut live: HashSet<String> = HashSet::with_capacity(videos.len() * 2);
        for video in videos {
            live.insert(video.id.to_string());
            if self.layout.exists(&ArtifactKey::gif(&video.id)) {
                live.insert(gif_media_id(&video.id));
            }
        }

        let result = match self.settings.tag_persistence {
            TagPersistence::Append => state.index.prune(&live).map(|_| ()),
            TagPersistence::Rewrite if state.entries.is_empty() && !state.index.path().exists() => {
                Ok(())
            }
            TagPersistence::Rewrite => {
                let entries = std::mem::take(&mut state.entries);
                state.entries = prune_entries(entries, &live);
                state.index.rewrite(&state.entries)
            }
        };
        if let Err(e) = result {
            error!(path = %state.index.path().display(), "Failed to prune tag index: {}", e);
        }
    }
}
