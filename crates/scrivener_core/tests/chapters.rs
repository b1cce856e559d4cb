use std::sync::Once;

use pretty_assertions::assert_eq;
use scrivener_core::{
    collect_chapters, ChatMessage, ExportSelection, ExtractionSpec,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrivener_logging::initialize_for_tests);
}

fn ai(text: &str) -> ChatMessage {
    ChatMessage {
        is_user: false,
        author: "AI".to_string(),
        text: text.to_string(),
    }
}

fn user(text: &str) -> ChatMessage {
    ChatMessage {
        is_user: true,
        author: "User".to_string(),
        text: text.to_string(),
    }
}

#[test]
fn collects_ai_messages_only_by_default() {
    init_logging();
    let messages = vec![
        user("Continue the story please"),
        ai("A long enough first chapter."),
        user("Continue the story please"),
        ai("A long enough second chapter."),
    ];
    let chapters = collect_chapters(
        &messages,
        &ExportSelection::default(),
        &ExtractionSpec::keep_all("\n\n"),
    );

    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].source_index, 1);
    assert_eq!(chapters[0].sequence, 1);
    assert!(!chapters[0].is_user);
    assert_eq!(chapters[1].source_index, 3);
    assert_eq!(chapters[1].sequence, 2);
}

#[test]
fn selection_can_include_user_messages() {
    init_logging();
    let messages = vec![user("A prompt that is long enough"), ai("A reply that is long enough")];
    let selection = ExportSelection {
        include_user: true,
        ..ExportSelection::default()
    };
    let chapters = collect_chapters(&messages, &selection, &ExtractionSpec::keep_all("\n\n"));
    assert_eq!(chapters.len(), 2);
    assert!(chapters[0].is_user);
    assert_eq!(chapters[0].author, "User");
}

#[test]
fn range_is_clamped_to_message_count() {
    init_logging();
    let messages = vec![
        ai("Chapter number zero, long enough."),
        ai("Chapter number one, long enough."),
        ai("Chapter number two, long enough."),
    ];
    let selection = ExportSelection {
        all: false,
        start_index: 1,
        end_index: 500,
        ..ExportSelection::default()
    };
    let chapters = collect_chapters(&messages, &selection, &ExtractionSpec::keep_all("\n\n"));
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].source_index, 1);
    assert_eq!(chapters[1].source_index, 2);
}

#[test]
fn tags_mode_skips_messages_without_matches() {
    init_logging();
    let messages = vec![
        ai("<content>The real chapter body goes here.</content>"),
        ai("No tags in this one at all, just prose."),
    ];
    let spec = ExtractionSpec::tags_only(vec!["content".to_string()], "\n\n");
    let chapters = collect_chapters(&messages, &ExportSelection::default(), &spec);
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].content, "The real chapter body goes here.");
}

#[test]
fn tags_mode_with_empty_tag_list_keeps_everything() {
    init_logging();
    let messages = vec![ai("Plain prose, no tags, long enough.")];
    let spec = ExtractionSpec::tags_only(Vec::new(), "\n\n");
    let chapters = collect_chapters(&messages, &ExportSelection::default(), &spec);
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].content, "Plain prose, no tags, long enough.");
}

#[test]
fn very_short_content_is_dropped() {
    init_logging();
    let messages = vec![ai("ok"), ai("This one clears the floor easily.")];
    let chapters = collect_chapters(
        &messages,
        &ExportSelection::default(),
        &ExtractionSpec::keep_all("\n\n"),
    );
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].source_index, 1);
    assert_eq!(chapters[0].sequence, 1);
}

#[test]
fn empty_message_list_yields_no_chapters() {
    init_logging();
    let chapters = collect_chapters(
        &[],
        &ExportSelection::default(),
        &ExtractionSpec::keep_all("\n\n"),
    );
    assert!(chapters.is_empty());
}
