use std::sync::Once;

use pretty_assertions::assert_eq;
use scrivener_core::{extract, parse_tag_input, ExtractMode, ExtractionSpec};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrivener_logging::initialize_for_tests);
}

fn tags_spec(tags: &[&str]) -> ExtractionSpec {
    ExtractionSpec::tags_only(tags.iter().map(|t| t.to_string()).collect(), "\n\n")
}

#[test]
fn all_mode_returns_text_unchanged() {
    init_logging();
    let text = "<thinking>plan</thinking>\nChapter one.\n";
    let spec = ExtractionSpec::keep_all("\n\n");
    assert_eq!(extract(text, &spec), text);
}

#[test]
fn single_tag_returns_trimmed_content() {
    init_logging();
    let text = "prefix <content>  Chapter one.  </content> suffix";
    assert_eq!(extract(text, &tags_spec(&["content"])), "Chapter one.");
}

#[test]
fn absent_tag_returns_empty() {
    init_logging();
    let text = "<content>Chapter one.</content>";
    assert_eq!(extract(text, &tags_spec(&["narration"])), "");
}

#[test]
fn tag_list_order_wins_over_document_order() {
    init_logging();
    let text = "<b>2</b><a>1</a>";
    let spec = ExtractionSpec::tags_only(vec!["a".to_string(), "b".to_string()], "|");
    assert_eq!(extract(text, &spec), "1|2");
}

#[test]
fn repeated_tags_kept_in_document_order() {
    init_logging();
    let text = "<c>one</c> noise <c>two</c> noise <c>three</c>";
    let spec = ExtractionSpec::tags_only(vec!["c".to_string()], " ");
    assert_eq!(extract(text, &spec), "one two three");
}

#[test]
fn tag_names_match_case_insensitively() {
    init_logging();
    let text = "<Content>inner</CONTENT>";
    assert_eq!(extract(text, &tags_spec(&["content"])), "inner");
}

#[test]
fn attributes_in_opening_tag_are_ignored() {
    init_logging();
    let text = r#"<content type="story" hidden>inner</content>"#;
    assert_eq!(extract(text, &tags_spec(&["content"])), "inner");
}

#[test]
fn matching_is_non_greedy_across_nested_same_tags() {
    init_logging();
    // The first closer ends the match; nesting is not special-cased.
    let text = "<c>outer <c>inner</c> tail</c>";
    let spec = ExtractionSpec::tags_only(vec!["c".to_string()], "|");
    assert_eq!(extract(text, &spec), "outer <c>inner");
}

#[test]
fn content_may_span_lines() {
    init_logging();
    let text = "<content>line one\nline two</content>";
    assert_eq!(extract(text, &tags_spec(&["content"])), "line one\nline two");
}

#[test]
fn empty_content_matches_are_discarded() {
    init_logging();
    let text = "<c>   </c><c>kept</c>";
    assert_eq!(extract(text, &tags_spec(&["c"])), "kept");
}

#[test]
fn special_characters_in_tag_names_are_escaped() {
    init_logging();
    // A regex metacharacter in the tag name must match literally, not blow up.
    let text = "<c.d>literal</c.d><cxd>not this</cxd>";
    assert_eq!(extract(text, &tags_spec(&["c.d"])), "literal");
}

#[test]
fn empty_tags_or_empty_text_return_empty() {
    init_logging();
    assert_eq!(extract("<c>inner</c>", &tags_spec(&[])), "");
    assert_eq!(extract("", &tags_spec(&["c"])), "");
}

#[test]
fn non_ascii_tag_names_are_supported() {
    init_logging();
    let text = "<正文>第一章</正文><旁白>场景</旁白>";
    let spec = ExtractionSpec::tags_only(vec!["正文".to_string(), "旁白".to_string()], "\n");
    assert_eq!(extract(text, &spec), "第一章\n场景");
}

#[test]
fn parse_tag_input_splits_on_separators() {
    init_logging();
    assert_eq!(
        parse_tag_input("content, detail;  正文\nnarration"),
        vec!["content", "detail", "正文", "narration"]
    );
    assert_eq!(parse_tag_input("a，b；c"), vec!["a", "b", "c"]);
    assert_eq!(parse_tag_input("   \n  "), Vec::<String>::new());
}

#[test]
fn all_mode_ignores_tag_list() {
    init_logging();
    let text = "<c>inner</c> outer";
    let spec = ExtractionSpec {
        tags: vec!["c".to_string()],
        separator: "|".to_string(),
        mode: ExtractMode::All,
    };
    assert_eq!(extract(text, &spec), text);
}
