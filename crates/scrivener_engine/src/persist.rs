use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use scrivener_core::{ExportSelection, ExtractMode, ProgressState};
use scrivener_logging::{scriv_error, scriv_info, scriv_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::GenerationSettings;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then
/// renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Everything needed to resume a run after a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSnapshot {
    pub settings: GenerationSettings,
    pub progress: ProgressState,
}

/// Settings persistence collaborator. Saves are fire-and-forget; loading is
/// tolerant of missing or unreadable state.
pub trait SettingsStore: Send + Sync {
    /// Loads the last saved snapshot, or `None` when absent or unreadable.
    /// Transient run flags (`running`/`paused`/`aborted`) come back cleared.
    fn load(&self) -> Option<RunSnapshot>;

    /// Persists `snapshot`. Implementations log failures and return.
    fn save(&self, snapshot: &RunSnapshot);
}

const STATE_FILENAME: &str = ".scrivener_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSnapshot {
    settings: PersistedSettings,
    progress: PersistedProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSettings {
    total_chapters: u32,
    prompt: String,
    initial_wait_ms: u64,
    delay_after_generation_ms: u64,
    poll_interval_ms: u64,
    stability_check_interval_ms: u64,
    stability_required_count: u32,
    response_timeout_ms: u64,
    retry_backoff_ms: u64,
    auto_save_interval: u32,
    max_retries: u32,
    min_chapter_length: usize,
    tags_mode: bool,
    extract_tags: String,
    tag_separator: String,
    export_all: bool,
    export_start_index: usize,
    export_end_index: usize,
    export_include_user: bool,
    export_include_ai: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedProgress {
    current_index: u32,
    total_target: u32,
}

impl PersistedSnapshot {
    fn from_snapshot(snapshot: &RunSnapshot) -> Self {
        let s = &snapshot.settings;
        Self {
            settings: PersistedSettings {
                total_chapters: s.total_chapters,
                prompt: s.prompt.clone(),
                initial_wait_ms: s.initial_wait_time.as_millis() as u64,
                delay_after_generation_ms: s.delay_after_generation.as_millis() as u64,
                poll_interval_ms: s.poll_interval.as_millis() as u64,
                stability_check_interval_ms: s.stability_check_interval.as_millis() as u64,
                stability_required_count: s.stability_required_count,
                response_timeout_ms: s.response_timeout.as_millis() as u64,
                retry_backoff_ms: s.retry_backoff.as_millis() as u64,
                auto_save_interval: s.auto_save_interval,
                max_retries: s.max_retries,
                min_chapter_length: s.min_chapter_length,
                tags_mode: s.extract_mode == ExtractMode::Tags,
                extract_tags: s.extract_tags.clone(),
                tag_separator: s.tag_separator.clone(),
                export_all: s.selection.all,
                export_start_index: s.selection.start_index,
                export_end_index: s.selection.end_index,
                export_include_user: s.selection.include_user,
                export_include_ai: s.selection.include_ai,
            },
            progress: PersistedProgress {
                current_index: snapshot.progress.current_index,
                total_target: snapshot.progress.total_target,
            },
        }
    }

    fn into_snapshot(self) -> RunSnapshot {
        let s = self.settings;
        let settings = GenerationSettings {
            total_chapters: s.total_chapters,
            prompt: s.prompt,
            initial_wait_time: Duration::from_millis(s.initial_wait_ms),
            delay_after_generation: Duration::from_millis(s.delay_after_generation_ms),
            poll_interval: Duration::from_millis(s.poll_interval_ms),
            stability_check_interval: Duration::from_millis(s.stability_check_interval_ms),
            stability_required_count: s.stability_required_count,
            response_timeout: Duration::from_millis(s.response_timeout_ms),
            retry_backoff: Duration::from_millis(s.retry_backoff_ms),
            auto_save_interval: s.auto_save_interval,
            max_retries: s.max_retries,
            min_chapter_length: s.min_chapter_length,
            extract_mode: if s.tags_mode {
                ExtractMode::Tags
            } else {
                ExtractMode::All
            },
            extract_tags: s.extract_tags,
            tag_separator: s.tag_separator,
            selection: ExportSelection {
                all: s.export_all,
                start_index: s.export_start_index,
                end_index: s.export_end_index,
                include_user: s.export_include_user,
                include_ai: s.export_include_ai,
            },
        };
        // A freshly loaded run is never mid-flight.
        let progress = ProgressState {
            current_index: self.progress.current_index.min(self.progress.total_target),
            total_target: self.progress.total_target,
            running: false,
            paused: false,
            aborted: false,
        };
        RunSnapshot { settings, progress }
    }
}

/// RON-file settings store; the default persistence collaborator.
pub struct RonSettingsStore {
    dir: PathBuf,
}

impl RonSettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILENAME)
    }
}

impl SettingsStore for RonSettingsStore {
    fn load(&self) -> Option<RunSnapshot> {
        let path = self.state_path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return None;
            }
            Err(err) => {
                scriv_warn!("Failed to read persisted state from {:?}: {}", path, err);
                return None;
            }
        };

        let persisted: PersistedSnapshot = match ron::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                scriv_warn!("Failed to parse persisted state from {:?}: {}", path, err);
                return None;
            }
        };

        scriv_info!("Loaded persisted run state from {:?}", path);
        Some(persisted.into_snapshot())
    }

    fn save(&self, snapshot: &RunSnapshot) {
        let persisted = PersistedSnapshot::from_snapshot(snapshot);
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&persisted, pretty) {
            Ok(text) => text,
            Err(err) => {
                scriv_error!("Failed to serialize persisted state: {}", err);
                return;
            }
        };

        let writer = AtomicFileWriter::new(self.dir.clone());
        if let Err(err) = writer.write(STATE_FILENAME, &content) {
            scriv_error!("Failed to write persisted state to {:?}: {}", self.dir, err);
        }
    }
}
