use std::sync::{Arc, Once};

use pretty_assertions::assert_eq;
use scrivener_core::Chapter;
use scrivener_engine::{ExportFormat, ExportOptions, Exporter, FileExporter};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrivener_logging::initialize_for_tests);
}

const STAMP: &str = "2026-01-02T03:04:05+00:00";

fn fixed_clock_exporter(options: ExportOptions) -> FileExporter {
    FileExporter::with_clock(options, Arc::new(|| STAMP.to_string()))
}

fn sample_chapters() -> Vec<Chapter> {
    vec![
        Chapter {
            source_index: 1,
            sequence: 1,
            is_user: false,
            author: "AI".to_string(),
            content: "The first chapter body.".to_string(),
        },
        Chapter {
            source_index: 3,
            sequence: 2,
            is_user: false,
            author: "AI".to_string(),
            content: "The second chapter body.\n".to_string(),
        },
    ]
}

#[test]
fn text_export_writes_header_and_delimited_chapters() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let exporter = fixed_clock_exporter(ExportOptions::new(dir.path()));

    let summary = exporter.export(&sample_chapters(), false).expect("export");

    assert_eq!(summary.chapter_count, 2);
    let content = std::fs::read_to_string(&summary.output_path).expect("read back");
    assert!(content.starts_with(&format!(
        "exported_utc: {STAMP}\nchapters: 2\ncharacters: {}\n",
        summary.total_characters
    )));
    assert!(content.contains("===== [1] AI =====\n\nThe first chapter body."));
    assert!(content.contains("===== [3] AI =====\n\nThe second chapter body.\n\n"));
}

#[test]
fn filenames_carry_chapter_count_and_sanitized_stamp() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let exporter = fixed_clock_exporter(ExportOptions::new(dir.path()));

    let summary = exporter.export(&sample_chapters(), true).expect("export");

    let name = summary.output_path.file_name().unwrap().to_string_lossy();
    assert_eq!(name, "novel_2ch_2026-01-02T03-04-05-00-00.txt");
}

#[test]
fn json_export_round_trips_through_serde() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let options = ExportOptions {
        format: ExportFormat::Json,
        ..ExportOptions::new(dir.path())
    };
    let exporter = fixed_clock_exporter(options);

    let summary = exporter.export(&sample_chapters(), false).expect("export");
    assert!(summary
        .output_path
        .extension()
        .is_some_and(|ext| ext == "json"));

    let content = std::fs::read_to_string(&summary.output_path).expect("read back");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["exported_utc"], STAMP);
    assert_eq!(value["chapter_count"], 2);
    assert_eq!(value["chapters"][0]["source_index"], 1);
    assert_eq!(value["chapters"][1]["content"], "The second chapter body.\n");
}

#[test]
fn repeated_exports_overwrite_deterministically() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let exporter = fixed_clock_exporter(ExportOptions::new(dir.path()));

    let first = exporter.export(&sample_chapters(), true).expect("export");
    let second = exporter.export(&sample_chapters(), true).expect("export");

    // Same clock, same chapters: the file is replaced, not duplicated.
    assert_eq!(first.output_path, second.output_path);
    let files: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
        .collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn character_totals_count_chars_not_bytes() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let exporter = fixed_clock_exporter(ExportOptions::new(dir.path()));
    let chapters = vec![Chapter {
        source_index: 0,
        sequence: 1,
        is_user: false,
        author: "AI".to_string(),
        content: "第一章：十个汉字正文".to_string(),
    }];

    let summary = exporter.export(&chapters, false).expect("export");
    assert_eq!(summary.total_characters, 10);
}
