//! Run counters.
//!
//! Emitted through the `metrics` facade; nothing is recorded unless the
//! embedding process installs a recorder.

use metrics::counter;

/// Metric names as constants for consistency.
pub mod names {
    pub const VIDEOS_PROCESSED_TOTAL: &str = "vprev_videos_processed_total";
    pub const VIDEOS_SKIPPED_TOTAL: &str = "vprev_videos_skipped_total";
    pub const VIDEOS_FAILED_TOTAL: &str = "vprev_videos_failed_total";
    pub const ARTIFACTS_GENERATED_TOTAL: &str = "vprev_artifacts_generated_total";
    pub const TAG_ENTRIES_WRITTEN_TOTAL: &str = "vprev_tag_entries_written_total";
}

pub fn record_video_processed() {
    counter!(names::VIDEOS_PROCESSED_TOTAL).increment(1);
}

pub fn record_video_skipped(reason: &'static str) {
    counter!(names::VIDEOS_SKIPPED_TOTAL, "reason" => reason).increment(1);
}

pub fn record_video_failed(stage: &'static str) {
    counter!(names::VIDEOS_FAILED_TOTAL, "stage" => stage).increment(1);
}

pub fn record_artifact_generated(kind: &'static str) {
    counter!(names::ARTIFACTS_GENERATED_TOTAL, "kind" => kind).increment(1);
}

pub fn record_tag_entry(media_type: &'static str) {
    counter!(names::TAG_ENTRIES_WRITTEN_TOTAL, "media_type" => media_type).increment(1);
}
