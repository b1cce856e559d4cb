use std::time::Duration;

use scrivener_core::{parse_tag_input, ExportSelection, ExtractMode, ExtractionSpec};

/// All knobs recognized by the controller and detector.
///
/// Durations are wall-clock and apply per wait phase, never cumulatively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Target number of units for a full run.
    pub total_chapters: u32,
    /// Prompt submitted for every unit.
    pub prompt: String,
    /// Delay between surface readiness and prompt submission.
    pub initial_wait_time: Duration,
    /// Settle delay after stability has been declared.
    pub delay_after_generation: Duration,
    /// Base cadence of readiness/arrival/pause polling.
    pub poll_interval: Duration,
    /// Cadence of the stability confirmation samples.
    pub stability_check_interval: Duration,
    /// Consecutive unchanged-length samples required to declare stability.
    pub stability_required_count: u32,
    /// Ceiling on waiting for a new message to appear at all.
    pub response_timeout: Duration,
    /// Fixed wait between retries of a failed unit.
    pub retry_backoff: Duration,
    /// Silent checkpoint export every N committed units; 0 disables.
    pub auto_save_interval: u32,
    /// Attempts per unit before the failure is recorded and skipped.
    pub max_retries: u32,
    /// Responses shorter than this (in characters) fail validation.
    pub min_chapter_length: usize,
    pub extract_mode: ExtractMode,
    /// Raw tag input as the user typed it; parsed on use.
    pub extract_tags: String,
    pub tag_separator: String,
    pub selection: ExportSelection,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            total_chapters: 1000,
            prompt: "Continue the story; keep the plot flowing naturally and the characters \
                     consistent."
                .to_string(),
            initial_wait_time: Duration::from_millis(2000),
            delay_after_generation: Duration::from_millis(3000),
            poll_interval: Duration::from_millis(300),
            stability_check_interval: Duration::from_millis(1000),
            stability_required_count: 5,
            response_timeout: Duration::from_secs(300),
            retry_backoff: Duration::from_secs(5),
            auto_save_interval: 50,
            max_retries: 3,
            min_chapter_length: 100,
            extract_mode: ExtractMode::All,
            extract_tags: String::new(),
            tag_separator: "\n\n".to_string(),
            selection: ExportSelection::default(),
        }
    }
}

impl GenerationSettings {
    /// The extraction spec implied by the current mode and tag input.
    /// Tags mode with no usable tags degrades to keeping everything.
    pub fn extraction_spec(&self) -> ExtractionSpec {
        match self.extract_mode {
            ExtractMode::All => ExtractionSpec::keep_all(self.tag_separator.clone()),
            ExtractMode::Tags => {
                let tags = parse_tag_input(&self.extract_tags);
                if tags.is_empty() {
                    ExtractionSpec::keep_all(self.tag_separator.clone())
                } else {
                    ExtractionSpec::tags_only(tags, self.tag_separator.clone())
                }
            }
        }
    }
}
