use std::time::Instant;

use scrivener_logging::scriv_debug;
use tokio::time::sleep;

use crate::config::GenerationSettings;
use crate::controls::RunControls;
use crate::error::GenerationError;
use crate::surface::{ChatSurface, ResponseSnapshot};

/// Decides when an externally rendered response has finished arriving.
///
/// The host never signals completion, so three independent stall signals are
/// combined: the surface's busy indicator, a consecutive unchanged-length
/// counter, and a wall-clock ceiling on the arrival wait. None of them is
/// reliable alone; indicators can be absent and streaming can pause mid-output.
pub struct StabilityDetector<'a> {
    surface: &'a dyn ChatSurface,
    settings: &'a GenerationSettings,
    controls: &'a RunControls,
}

impl<'a> StabilityDetector<'a> {
    pub fn new(
        surface: &'a dyn ChatSurface,
        settings: &'a GenerationSettings,
        controls: &'a RunControls,
    ) -> Self {
        Self {
            surface,
            settings,
            controls,
        }
    }

    /// Waits until a response newer than `prior_count` has stabilized and
    /// returns its final snapshot.
    ///
    /// Fails with `Timeout` when no new message appears within
    /// `response_timeout`, or `Aborted` as soon as the abort flag is seen.
    pub async fn await_stable_response(
        &self,
        prior_count: usize,
    ) -> Result<ResponseSnapshot, GenerationError> {
        // Phase 1: a new AI message must appear within the timeout. The
        // timeout is measured from the start of this phase only.
        let started = Instant::now();
        loop {
            self.check_abort()?;
            if self.observe().await.message_count > prior_count {
                break;
            }
            if started.elapsed() > self.settings.response_timeout {
                return Err(GenerationError::Timeout);
            }
            sleep(self.settings.poll_interval).await;
        }

        // Give the surface one poll to flip its busy indicator on.
        sleep(self.settings.poll_interval).await;

        // Phase 2: absorb streaming while the busy indicator is shown.
        while self.surface.is_generating().await {
            self.check_abort()?;
            sleep(self.settings.poll_interval).await;
        }

        // Phase 3: stability confirmation. Length must hold steady (and be
        // non-empty) for the required number of consecutive samples; a busy
        // indicator at any point restarts the count. This debounces
        // re-renders that briefly pause without showing the indicator.
        let mut last_length = 0usize;
        let mut stable_samples = 0u32;
        while stable_samples < self.settings.stability_required_count {
            self.check_abort()?;
            if self.surface.is_generating().await {
                stable_samples = 0;
                sleep(self.settings.poll_interval).await;
                continue;
            }
            let snapshot = self.observe().await;
            if snapshot.last_length == last_length && last_length > 0 {
                stable_samples += 1;
            } else {
                stable_samples = 0;
                last_length = snapshot.last_length;
            }
            sleep(self.settings.stability_check_interval).await;
        }
        scriv_debug!(
            "response stable at {} chars after {} unchanged samples",
            last_length,
            stable_samples
        );

        // Phase 4: settle delay for trailing UI updates.
        sleep(self.settings.delay_after_generation).await;
        Ok(self.observe().await)
    }

    async fn observe(&self) -> ResponseSnapshot {
        ResponseSnapshot::of_ai_messages(&self.surface.list_messages().await)
    }

    fn check_abort(&self) -> Result<(), GenerationError> {
        if self.controls.is_aborted() {
            Err(GenerationError::Aborted)
        } else {
            Ok(())
        }
    }
}
