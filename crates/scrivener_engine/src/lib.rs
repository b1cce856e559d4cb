//! Scrivener engine: drives a chat surface through repeated generation
//! cycles and exports the accumulated text.
mod config;
mod controller;
mod controls;
mod error;
mod export;
mod notify;
mod persist;
mod stability;
mod surface;

pub use config::GenerationSettings;
pub use controller::{GenerationController, RunSummary};
pub use controls::RunControls;
pub use error::GenerationError;
pub use export::{
    Clock, ExportError, ExportFormat, ExportOptions, ExportSummary, Exporter, FileExporter,
};
pub use notify::{LogNotifier, NotificationSink};
pub use persist::{
    ensure_output_dir, AtomicFileWriter, PersistError, RonSettingsStore, RunSnapshot,
    SettingsStore,
};
pub use stability::StabilityDetector;
pub use surface::{ChatSurface, ResponseSnapshot, SurfaceError};
