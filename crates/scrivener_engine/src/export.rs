use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use scrivener_core::Chapter;
use scrivener_logging::{scriv_debug, scriv_info};
use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};

/// Clock injected into exporters; returns an RFC 3339 timestamp.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    /// Filename stem; the chapter count and a timestamp are appended.
    pub basename: String,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ExportFormat::Text,
            basename: "novel".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub chapter_count: usize,
    pub total_characters: u64,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Export collaborator: writes a file-like artifact from collected chapters.
/// `silent` marks best-effort checkpoint exports; failures there must be
/// swallowed by the caller.
pub trait Exporter: Send + Sync {
    fn export(&self, chapters: &[Chapter], silent: bool) -> Result<ExportSummary, ExportError>;
}

const RULE: &str = "========================================";

/// Writes chapters atomically into an output directory, as concatenated text
/// or as a JSON document.
pub struct FileExporter {
    options: ExportOptions,
    clock: Clock,
}

impl FileExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self::with_clock(options, Arc::new(|| Utc::now().to_rfc3339()))
    }

    /// Injecting the clock keeps filenames and headers deterministic in tests.
    pub fn with_clock(options: ExportOptions, clock: Clock) -> Self {
        Self { options, clock }
    }

    fn filename(&self, chapter_count: usize, stamp: &str) -> String {
        // Timestamps contain characters that are hostile to filenames.
        let stamp: String = stamp
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect();
        let extension = match self.options.format {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        };
        format!(
            "{}_{}ch_{}.{}",
            self.options.basename, chapter_count, stamp, extension
        )
    }

    fn render_text(&self, chapters: &[Chapter], stamp: &str, total_characters: u64) -> String {
        let mut buffer = String::new();
        buffer.push_str(&format!(
            "exported_utc: {}\nchapters: {}\ncharacters: {}\n{}\n\n",
            stamp,
            chapters.len(),
            total_characters,
            RULE
        ));
        for chapter in chapters {
            buffer.push_str(&format!(
                "===== [{}] {} =====\n\n",
                chapter.source_index, chapter.author
            ));
            buffer.push_str(chapter.content.trim_end());
            buffer.push_str("\n\n");
        }
        buffer
    }

    fn render_json(&self, chapters: &[Chapter], stamp: &str) -> String {
        json!({
            "exported_utc": stamp,
            "chapter_count": chapters.len(),
            "chapters": chapters.iter().map(|ch| {
                json!({
                    "source_index": ch.source_index,
                    "sequence": ch.sequence,
                    "is_user": ch.is_user,
                    "author": ch.author,
                    "content": ch.content,
                })
            }).collect::<Vec<_>>()
        })
        .to_string()
    }
}

impl Exporter for FileExporter {
    fn export(&self, chapters: &[Chapter], silent: bool) -> Result<ExportSummary, ExportError> {
        let stamp = (self.clock)();
        let total_characters: u64 = chapters
            .iter()
            .map(|ch| ch.content.chars().count() as u64)
            .sum();

        let content = match self.options.format {
            ExportFormat::Text => self.render_text(chapters, &stamp, total_characters),
            ExportFormat::Json => self.render_json(chapters, &stamp),
        };

        let writer = AtomicFileWriter::new(self.options.output_dir.clone());
        let output_path = writer.write(&self.filename(chapters.len(), &stamp), &content)?;

        if silent {
            scriv_debug!("checkpoint export wrote {:?}", output_path);
        } else {
            scriv_info!("exported {} chapters to {:?}", chapters.len(), output_path);
        }
        Ok(ExportSummary {
            chapter_count: chapters.len(),
            total_characters,
            output_path,
        })
    }
}
