use crate::extract::{extract, ExtractMode, ExtractionSpec};

/// Chapters shorter than this (in characters, after extraction) are dropped
/// from exports; they are almost always leftover UI noise.
pub const MIN_CHAPTER_EXPORT_CHARS: usize = 10;

/// One message as reported by the chat surface, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub is_user: bool,
    pub author: String,
    pub text: String,
}

/// Range and author filters applied when collecting chapters for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSelection {
    /// When set, `start_index`/`end_index` are ignored.
    pub all: bool,
    pub start_index: usize,
    pub end_index: usize,
    pub include_user: bool,
    pub include_ai: bool,
}

impl Default for ExportSelection {
    fn default() -> Self {
        Self {
            all: true,
            start_index: 0,
            end_index: 99_999,
            include_user: false,
            include_ai: true,
        }
    }
}

/// One exportable unit produced from a surface message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Position of the source message in the surface's message list.
    pub source_index: usize,
    /// 1-based position within the collected output.
    pub sequence: usize,
    pub is_user: bool,
    pub author: String,
    pub content: String,
}

/// Collects exportable chapters from `messages`.
///
/// The selection range is clamped to the message list; extraction is applied
/// per message, except that tags mode with an empty tag list degrades to
/// keeping everything. Messages whose content ends up empty or at most
/// [`MIN_CHAPTER_EXPORT_CHARS`] characters are skipped.
pub fn collect_chapters(
    messages: &[ChatMessage],
    selection: &ExportSelection,
    spec: &ExtractionSpec,
) -> Vec<Chapter> {
    if messages.is_empty() {
        return Vec::new();
    }

    let (start, end) = if selection.all {
        (0, messages.len() - 1)
    } else {
        (
            selection.start_index,
            selection.end_index.min(messages.len() - 1),
        )
    };

    let use_tags = spec.mode == ExtractMode::Tags && !spec.tags.is_empty();

    let mut chapters = Vec::new();
    for (index, message) in messages.iter().enumerate() {
        if index < start || index > end {
            continue;
        }
        if message.is_user && !selection.include_user {
            continue;
        }
        if !message.is_user && !selection.include_ai {
            continue;
        }
        let content = if use_tags {
            extract(&message.text, spec)
        } else {
            message.text.clone()
        };
        if content.is_empty() && use_tags {
            continue;
        }
        if content.chars().count() <= MIN_CHAPTER_EXPORT_CHARS {
            continue;
        }
        chapters.push(Chapter {
            source_index: index,
            sequence: chapters.len() + 1,
            is_user: message.is_user,
            author: message.author.clone(),
            content,
        });
    }
    chapters
}
