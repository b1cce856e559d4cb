use std::sync::Arc;

use scrivener_core::{collect_chapters, GenerationStats, ProgressState, ProgressStore};
use scrivener_logging::{scriv_debug, scriv_info, scriv_warn};
use tokio::time::sleep;

use crate::config::GenerationSettings;
use crate::controls::RunControls;
use crate::error::GenerationError;
use crate::export::Exporter;
use crate::notify::NotificationSink;
use crate::persist::{RunSnapshot, SettingsStore};
use crate::stability::StabilityDetector;
use crate::surface::{ChatSurface, ResponseSnapshot};

/// Final tally of one `run_to_completion` call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub completed_units: u32,
    pub total_characters: u64,
    pub error_count: usize,
    pub aborted: bool,
}

/// Orchestrates the generation loop against a chat surface.
///
/// One logical task owns all state; every wait is a polling loop that checks
/// the shared pause/abort flags, so no unit of work ever runs concurrently
/// with another. The surface itself cannot be locked, which makes the
/// never-send-while-generating discipline the only mutual exclusion there is.
pub struct GenerationController {
    surface: Arc<dyn ChatSurface>,
    exporter: Arc<dyn Exporter>,
    notifier: Arc<dyn NotificationSink>,
    settings_store: Arc<dyn SettingsStore>,
    controls: RunControls,
    settings: GenerationSettings,
    store: ProgressStore,
}

impl GenerationController {
    pub fn new(
        surface: Arc<dyn ChatSurface>,
        exporter: Arc<dyn Exporter>,
        notifier: Arc<dyn NotificationSink>,
        settings_store: Arc<dyn SettingsStore>,
        settings: GenerationSettings,
    ) -> Self {
        let progress = ProgressState::new(settings.total_chapters);
        Self {
            surface,
            exporter,
            notifier,
            settings_store,
            controls: RunControls::new(),
            settings,
            store: ProgressStore::new(progress),
        }
    }

    /// Restores a persisted snapshot, typically from `SettingsStore::load`.
    /// The run resumes from the snapshot's committed index.
    pub fn resume_from(mut self, snapshot: RunSnapshot) -> Self {
        self.settings = snapshot.settings;
        let mut progress = snapshot.progress;
        progress.running = false;
        progress.paused = false;
        progress.aborted = false;
        self.store.set_progress(progress);
        self
    }

    /// Handle for pausing, resuming and aborting from outside the run.
    pub fn controls(&self) -> RunControls {
        self.controls.clone()
    }

    pub fn progress(&self) -> &ProgressState {
        self.store.progress()
    }

    pub fn stats(&self) -> &GenerationStats {
        self.store.stats()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Resets the committed index and stats. Refused while a run is active.
    pub fn reset_progress(&mut self) {
        if self.store.progress().running {
            self.notifier.warn("stop the run before resetting progress");
            return;
        }
        self.store.progress_mut().current_index = 0;
        self.store.reset_stats();
        self.persist();
        self.notifier.info("progress reset");
    }

    /// Drives the run from the committed index to the target.
    ///
    /// Per-unit failures are retried up to `max_retries`; exhausting retries
    /// records the error and advances anyway, so one bad unit never wedges
    /// the run. Abort is the only condition that unwinds the loop. The
    /// `running` flag is restored on every exit path.
    pub async fn run_to_completion(&mut self) -> RunSummary {
        if self.store.progress().running {
            self.notifier.warn("generation is already running");
            return self.summary(false);
        }

        self.controls.reset();
        {
            let progress = self.store.progress_mut();
            progress.running = true;
            progress.paused = false;
            progress.aborted = false;
        }
        self.store.reset_stats();
        self.persist();

        if self.surface.is_generating().await {
            self.notifier
                .info("waiting for the current generation to finish");
        }
        let outcome = match self.wait_until_ready().await {
            Ok(()) => self.run_loop().await,
            Err(err) => Err(err),
        };
        let aborted = matches!(outcome, Err(GenerationError::Aborted));

        {
            let progress = self.store.progress_mut();
            progress.running = false;
            progress.paused = false;
            progress.aborted = aborted;
        }
        self.persist();

        if aborted {
            self.notifier.warn("generation stopped");
        } else {
            self.notifier.success("generation complete");
            self.export_chapters(false).await;
        }
        self.summary(aborted)
    }

    async fn run_loop(&mut self) -> Result<(), GenerationError> {
        let total = self.store.progress().total_target;
        self.notifier.info(&format!(
            "starting generation of {} chapters",
            self.store.progress().remaining()
        ));

        let mut index = self.store.progress().current_index;
        while index < total {
            self.wait_while_paused().await?;

            let unit = index + 1;
            let mut attempts = 0;
            let mut succeeded = false;
            while !succeeded && attempts < self.settings.max_retries {
                match self.generate_unit(unit).await {
                    Ok(snapshot) => {
                        succeeded = true;
                        self.store.record_completed(snapshot.last_length as u64);
                        self.store.progress_mut().commit(unit);
                        self.persist();
                        self.notifier.success(&format!(
                            "chapter {unit} complete ({} chars)",
                            snapshot.last_length
                        ));
                    }
                    Err(GenerationError::Aborted) => return Err(GenerationError::Aborted),
                    Err(err) => {
                        attempts += 1;
                        scriv_warn!("chapter {unit} attempt {attempts} failed: {err}");
                        self.store.record_error(unit, err.to_string());
                        if attempts < self.settings.max_retries {
                            sleep(self.settings.retry_backoff).await;
                            // The failed response may still be settling.
                            self.wait_until_ready().await?;
                        }
                    }
                }
            }
            if !succeeded {
                // Forward progress over perfection: the failure is on record,
                // the index advances regardless.
                self.store.progress_mut().commit(unit);
                self.persist();
            }

            let committed = self.store.progress().current_index;
            let interval = self.settings.auto_save_interval;
            if interval > 0 && committed % interval == 0 {
                self.export_chapters(true).await;
            }
            index = unit;
        }
        Ok(())
    }

    /// One unit: readiness, settle, submit, await stability, validate.
    async fn generate_unit(&self, unit: u32) -> Result<ResponseSnapshot, GenerationError> {
        self.wait_until_ready().await?;
        let prior =
            ResponseSnapshot::of_ai_messages(&self.surface.list_messages().await).message_count;

        // Let the UI settle before touching the input.
        sleep(self.settings.initial_wait_time).await;
        if self.controls.is_aborted() {
            return Err(GenerationError::Aborted);
        }

        scriv_debug!("submitting prompt for chapter {unit}");
        self.surface.submit_prompt(&self.settings.prompt).await?;

        let detector = StabilityDetector::new(self.surface.as_ref(), &self.settings, &self.controls);
        let snapshot = detector.await_stable_response(prior).await?;

        if snapshot.last_length < self.settings.min_chapter_length {
            return Err(GenerationError::TooShort {
                length: snapshot.last_length,
                minimum: self.settings.min_chapter_length,
            });
        }
        Ok(snapshot)
    }

    /// Blocks until the surface is free. A prompt is never injected while a
    /// generation is in flight.
    async fn wait_until_ready(&self) -> Result<(), GenerationError> {
        while self.surface.is_generating().await {
            if self.controls.is_aborted() {
                return Err(GenerationError::Aborted);
            }
            sleep(self.settings.poll_interval).await;
        }
        if self.controls.is_aborted() {
            return Err(GenerationError::Aborted);
        }
        Ok(())
    }

    /// Pause freezes progress between units; nothing is rolled back and the
    /// run stays alive for resume.
    async fn wait_while_paused(&mut self) -> Result<(), GenerationError> {
        if self.controls.is_aborted() {
            return Err(GenerationError::Aborted);
        }
        if !self.controls.is_paused() {
            return Ok(());
        }

        self.store.progress_mut().paused = true;
        self.persist();
        scriv_info!(
            "run paused at index {}",
            self.store.progress().current_index
        );
        while self.controls.is_paused() {
            if self.controls.is_aborted() {
                return Err(GenerationError::Aborted);
            }
            sleep(self.settings.poll_interval).await;
        }
        self.store.progress_mut().paused = false;
        self.persist();
        scriv_info!("run resumed");
        Ok(())
    }

    /// Collects chapters from the surface and hands them to the exporter.
    /// Failures never propagate; checkpoint (silent) exports stay quiet.
    async fn export_chapters(&self, silent: bool) {
        let messages = self.surface.list_messages().await;
        let chapters = collect_chapters(
            &messages,
            &self.settings.selection,
            &self.settings.extraction_spec(),
        );
        if chapters.is_empty() {
            if !silent {
                self.notifier.warn("nothing to export");
            }
            return;
        }

        match self.exporter.export(&chapters, silent) {
            Ok(summary) => {
                if !silent {
                    self.notifier
                        .success(&format!("exported {} chapters", summary.chapter_count));
                }
            }
            Err(err) => {
                scriv_warn!("export failed: {err}");
                if !silent {
                    self.notifier.warn(&format!("export failed: {err}"));
                }
            }
        }
    }

    fn persist(&self) {
        self.settings_store.save(&RunSnapshot {
            settings: self.settings.clone(),
            progress: self.store.progress().clone(),
        });
    }

    fn summary(&self, aborted: bool) -> RunSummary {
        let stats = self.store.stats();
        RunSummary {
            completed_units: stats.completed_count,
            total_characters: stats.total_characters,
            error_count: stats.errors.len(),
            aborted,
        }
    }
}
