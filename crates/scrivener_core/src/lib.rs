//! Scrivener core: pure progress state machine and text transforms.
mod chapter;
mod extract;
mod progress;

pub use chapter::{collect_chapters, Chapter, ChatMessage, ExportSelection, MIN_CHAPTER_EXPORT_CHARS};
pub use extract::{extract, parse_tag_input, ExtractMode, ExtractionSpec};
pub use progress::{ChapterError, GenerationStats, ProgressState, ProgressStore};
