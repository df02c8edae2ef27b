//! Run configuration front-ends.

use dialoguer::{Confirm, Input};

use crate::error::{PipelineError, PipelineResult};
use vprev_models::config::{
    validate_fps, validate_segment_length, validate_tag_count, validate_width, DEFAULT_FPS,
    DEFAULT_SEGMENT_LENGTH, DEFAULT_TAGS_PER_ITEM, DEFAULT_WIDTH,
};
use vprev_models::RunConfiguration;

/// Source of the validated options for one run.
pub trait ConfigFrontend: Send + Sync {
    fn collect(&self) -> PipelineResult<RunConfiguration>;
}

/// Asks the operator on the terminal. Invalid answers are re-prompted.
///
/// The clear-cache question is only asked when some step is enabled, and
/// numeric questions only when the step they affect is enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct InteractivePrompt;

impl InteractivePrompt {
    pub fn new() -> Self {
        Self
    }

    fn confirm(prompt: &str) -> PipelineResult<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| PipelineError::prompt(format!("{}: {}", prompt, e)))
    }
}

impl ConfigFrontend for InteractivePrompt {
    fn collect(&self) -> PipelineResult<RunConfiguration> {
        let generate_thumbs = Self::confirm("Generate thumbnails and WebM clips?")?;
        let generate_gifs = Self::confirm("Generate GIFs?")?;
        let generate_tags = Self::confirm("Generate tags?")?;

        let mut builder = RunConfiguration::builder()
            .generate_thumbs(generate_thumbs)
            .generate_gifs(generate_gifs)
            .generate_tags(generate_tags);

        if builder.clone().build()?.has_work() {
            builder = builder.clear_cache(Self::confirm("Clear cache?")?);
        }

        if generate_thumbs {
            let fps: u32 = Input::new()
                .with_prompt("FPS for WebM clips")
                .default(DEFAULT_FPS)
                .validate_with(|v: &u32| validate_fps(*v).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(|e| PipelineError::prompt(e.to_string()))?;

            let width: u32 = Input::new()
                .with_prompt("Resolution width (320-480)")
                .default(DEFAULT_WIDTH)
                .validate_with(|v: &u32| validate_width(*v).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(|e| PipelineError::prompt(e.to_string()))?;

            let segment_length: u32 = Input::new()
                .with_prompt("WebM segment length in seconds (1-20)")
                .default(DEFAULT_SEGMENT_LENGTH)
                .validate_with(|v: &u32| validate_segment_length(*v).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(|e| PipelineError::prompt(e.to_string()))?;

            builder = builder
                .fps(fps)
                .width(width)
                .segment_length_seconds(segment_length);
        }

        if generate_tags {
            let tags: usize = Input::new()
                .with_prompt("Number of tags")
                .default(DEFAULT_TAGS_PER_ITEM)
                .validate_with(|v: &usize| validate_tag_count(*v).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(|e| PipelineError::prompt(e.to_string()))?;
            builder = builder.tags_per_item(tags);
        }

        Ok(builder.build()?)
    }
}

/// Non-interactive front-end returning a preset configuration.
#[derive(Debug, Clone)]
pub struct FixedConfig(pub RunConfiguration);

impl ConfigFrontend for FixedConfig {
    fn collect(&self) -> PipelineResult<RunConfiguration> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_config() {
        let config = RunConfiguration::builder()
            .generate_thumbs(true)
            .width(320)
            .build()
            .unwrap();
        let collected = FixedConfig(config.clone()).collect().unwrap();
        assert_eq!(collected, config);
        assert_eq!(collected.target_resolution.height, 180);
    }
}
