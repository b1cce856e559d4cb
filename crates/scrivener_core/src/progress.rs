use std::time::Instant;

/// Resumable position of a generation run.
///
/// Mutated only by the generation controller; the controller persists a copy
/// through its settings store after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub current_index: u32,
    pub total_target: u32,
    pub running: bool,
    pub paused: bool,
    pub aborted: bool,
}

impl ProgressState {
    pub fn new(total_target: u32) -> Self {
        Self {
            current_index: 0,
            total_target,
            running: false,
            paused: false,
            aborted: false,
        }
    }

    /// Number of units still to generate.
    pub fn remaining(&self) -> u32 {
        self.total_target.saturating_sub(self.current_index)
    }

    /// Commits one unit of work. `current_index` never exceeds the target.
    pub fn commit(&mut self, index: u32) {
        debug_assert!(index <= self.total_target);
        self.current_index = index.min(self.total_target);
    }
}

/// One failed attempt, recorded per unit and attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterError {
    /// 1-based unit number the failure belongs to.
    pub index: u32,
    pub message: String,
}

/// Counters for the run in progress. Reset at run start, append-only after.
#[derive(Debug, Clone, Default)]
pub struct GenerationStats {
    pub started_at: Option<Instant>,
    pub completed_count: u32,
    pub total_characters: u64,
    pub errors: Vec<ChapterError>,
}

/// Holds progress and stats for the controller. Pure state; persistence is
/// the caller's responsibility.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    progress: ProgressState,
    stats: GenerationStats,
}

impl ProgressStore {
    pub fn new(progress: ProgressState) -> Self {
        Self {
            progress,
            stats: GenerationStats::default(),
        }
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressState {
        &mut self.progress
    }

    pub fn set_progress(&mut self, progress: ProgressState) {
        self.progress = progress;
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn record_error(&mut self, index: u32, message: impl Into<String>) {
        self.stats.errors.push(ChapterError {
            index,
            message: message.into(),
        });
    }

    pub fn record_completed(&mut self, characters: u64) {
        self.stats.completed_count += 1;
        self.stats.total_characters += characters;
    }

    /// Clears stats and stamps the start of a new run.
    pub fn reset_stats(&mut self) {
        self.stats = GenerationStats {
            started_at: Some(Instant::now()),
            ..GenerationStats::default()
        };
    }
}
