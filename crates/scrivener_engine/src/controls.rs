use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable pause/abort handle shared between the controller and whoever
/// drives it.
///
/// Both flags are cooperative: the controller polls them at every suspension
/// point. Abort fails the current wait fast but never rolls back work already
/// committed; pause only freezes forward progress between units.
#[derive(Debug, Clone, Default)]
pub struct RunControls {
    flags: Arc<Flags>,
}

#[derive(Debug, Default)]
struct Flags {
    paused: AtomicBool,
    aborted: AtomicBool,
}

impl RunControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.flags.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.flags.paused.store(false, Ordering::SeqCst);
    }

    pub fn abort(&self) {
        self.flags.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.flags.paused.load(Ordering::SeqCst)
    }

    pub fn is_aborted(&self) -> bool {
        self.flags.aborted.load(Ordering::SeqCst)
    }

    /// Clears both flags at the start of a fresh run.
    pub(crate) fn reset(&self) {
        self.flags.paused.store(false, Ordering::SeqCst);
        self.flags.aborted.store(false, Ordering::SeqCst);
    }
}
