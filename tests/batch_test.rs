mod common;

use common::{read_sheet, DocxBuilder};
use docx_comments::core::workbook::HEADER;
use docx_comments::utils::batch_processor::{BatchProcessor, FileFailure};
use std::path::PathBuf;

fn header() -> Vec<String> {
    HEADER.iter().map(|h| h.to_string()).collect()
}

#[test]
fn valid_and_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let valid = DocxBuilder::new()
        .comment("0", "Author", "Comment")
        .paragraph("Intro")
        .commented("Text", "0")
        .write(dir.path(), "report.docx");
    let missing = dir.path().join("missing.docx");
    let output = dir.path().join("comments.xlsx");

    let report = BatchProcessor::new()
        .run(&[valid, missing.clone()], &output, |_| {})
        .unwrap();

    assert!(report.saved);
    assert_eq!(report.failures, vec![FileFailure::NotFound { path: missing.clone() }]);
    let message = report.error_report().unwrap();
    assert_eq!(message.matches("File not found").count(), 1);

    let sheet = read_sheet(&output);
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet[0], header());
    assert_eq!(sheet[1], vec!["report.docx", "Author", "Comment", "1", "Text"]);
}

#[test]
fn rows_follow_input_order_across_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = DocxBuilder::new()
        .comment("1", "Ann", "first note")
        .comment("2", "Ben", "second note")
        .commented("alpha", "1")
        .page_break("beta", Some("2"))
        .write(dir.path(), "first.docx");
    let second = DocxBuilder::new()
        .comment("0", "Cy", "third note")
        .commented("gamma", "0")
        .write(dir.path(), "second.docx");
    let output = dir.path().join("out.xlsx");

    let report = BatchProcessor::new()
        .run(&[second, first], &output, |_| {})
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.files_processed, 2);

    let sheet = read_sheet(&output);
    let rows: Vec<(&str, &str, &str)> = sheet[1..]
        .iter()
        .map(|r| (r[0].as_str(), r[2].as_str(), r[3].as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("second.docx", "third note", "1"),
            ("first.docx", "first note", "1"),
            ("first.docx", "second note", "2"),
        ]
    );
}

#[test]
fn corrupt_file_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let corrupt = dir.path().join("corrupt.docx");
    std::fs::write(&corrupt, b"PK\x03\x04 truncated").unwrap();
    let good = DocxBuilder::new()
        .comment("0", "Author", "Comment")
        .commented("Text", "0")
        .write(dir.path(), "good.docx");
    let output = dir.path().join("out.xlsx");

    let report = BatchProcessor::new()
        .run(&[corrupt.clone(), good], &output, |_| {})
        .unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(&report.failures[0], FileFailure::Parse { path, .. } if *path == corrupt));
    assert!(report.failures[0]
        .to_string()
        .starts_with(&format!("Error processing file {}:\n", corrupt.display())));
}

#[test]
fn repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<PathBuf> = (0..3)
        .map(|i| {
            DocxBuilder::new()
                .comment("0", "Author", &format!("note {}", i))
                .comment("1", "Other", "second")
                .commented("Text", "0")
                .page_break("More", Some("1"))
                .write(dir.path(), &format!("doc{}.docx", i))
        })
        .collect();
    let output = dir.path().join("out.xlsx");
    let processor = BatchProcessor::new();

    processor.run(&inputs, &output, |_| {}).unwrap();
    let first_bytes = std::fs::read(&output).unwrap();
    let first_sheet = read_sheet(&output);

    processor.run(&inputs, &output, |_| {}).unwrap();
    assert_eq!(read_sheet(&output), first_sheet);
    assert_eq!(std::fs::read(&output).unwrap(), first_bytes);
    assert_eq!(first_sheet.len(), 7);
}

#[test]
fn documents_without_comments_give_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let plain = DocxBuilder::new().paragraph("No review yet").write(dir.path(), "plain.docx");
    let output = dir.path().join("out.xlsx");

    let report = BatchProcessor::new().run(&[plain], &output, |_| {}).unwrap();

    assert!(report.is_success());
    assert!(report.error_report().is_none());
    assert_eq!(read_sheet(&output), vec![header()]);
}
