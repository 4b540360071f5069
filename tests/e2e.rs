//! End-to-end tests for edgequake-pdf2docx.
//!
//! Real PDFs are generated with `lopdf`, written to a temp directory, and
//! converted with the default lopdf extractor and docx-rs writer, exactly
//! as the `pdf2docx` binary does.

mod common;

use common::{create_test_pdf, document_xml, read_archive};
use edgequake_pdf2docx::{
    convert_files, convert_sync, convert_to_file, ConversionConfig, InputDocument, Pdf2DocxError,
};
use std::path::{Path, PathBuf};

fn write_pdf(dir: &Path, name: &str, text: &str) -> String {
    common::init_tracing();
    let path = dir.join(name);
    std::fs::write(&path, create_test_pdf(text)).unwrap();
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn converts_files_on_disk_into_archive_file() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.pdf");
    std::fs::write(&broken, b"this is not a real pdf").unwrap();
    let inputs = vec![
        write_pdf(dir.path(), "alpha.pdf", "Alpha report"),
        write_pdf(dir.path(), "Beta.PDF", "Beta summary"),
        broken.to_string_lossy().to_string(),
    ];

    let output_path: PathBuf = dir.path().join("out").join("converted_files.zip");
    let output = convert_to_file(&inputs, &output_path, &ConversionConfig::default())
        .await
        .unwrap();

    assert_eq!(output.stats.total_documents, 3);
    assert_eq!(output.stats.succeeded, 2);
    assert_eq!(output.stats.failed, 1);

    let on_disk = std::fs::read(&output_path).unwrap();
    assert_eq!(on_disk, output.archive);
    assert!(!output_path.with_extension("zip.tmp").exists());

    let entries = read_archive(&on_disk);
    let names: Vec<&str> = entries.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Beta.docx", "alpha.docx", "broken.pdf.error.txt"]);

    let xml = document_xml(&entries["alpha.docx"]);
    assert!(xml.contains("Alpha"), "alpha.docx lost its text: {xml}");

    let diagnostic = String::from_utf8(entries["broken.pdf.error.txt"].clone()).unwrap();
    assert!(diagnostic.starts_with("Conversion failed: "));
}

#[tokio::test]
async fn same_file_twice_is_disambiguated() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "dup.pdf", "Twice");

    let output = convert_files(&[path.as_str(), path.as_str()], &ConversionConfig::default())
        .await
        .unwrap();

    let names: Vec<String> = output.entries.iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec!["dup.docx", "dup-2.docx"]);
}

#[tokio::test]
async fn missing_input_aborts_before_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_pdf(dir.path(), "good.pdf", "fine");
    let missing = dir.path().join("nope.pdf").to_string_lossy().to_string();

    let err = convert_files(&[good, missing], &ConversionConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2DocxError::FileNotFound { .. }));
}

#[test]
fn sync_wrapper_converts_in_memory_documents() {
    let docs = vec![
        InputDocument::new("one.pdf", create_test_pdf("One")),
        InputDocument::new("two.pdf", b"plain text, no PDF header".to_vec()),
    ];
    let output = convert_sync(docs, &ConversionConfig::default()).unwrap();

    let entries = read_archive(&output.archive);
    assert!(entries.contains_key("one.docx"));
    let diagnostic = String::from_utf8(entries["two.pdf.error.txt"].clone()).unwrap();
    assert!(diagnostic.contains("not a valid PDF"), "got: {diagnostic}");
}
