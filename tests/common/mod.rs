//! Shared fixtures for integration tests: in-memory PDFs, fake backends,
//! and a ZIP reader.

#![allow(dead_code)]

use edgequake_pdf2docx::{BoxError, DocumentSerializer, TextExtractor};
use edgequake_pdf2docx::pipeline::model::StructuredDocument;
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Route library logs to the test harness. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A valid single-page PDF showing `text` in Helvetica.
pub fn create_test_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Resources" => resources_id,
        "Contents" => content_id,
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    });
    if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
        dict.set("Parent", pages_id);
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Every entry of a ZIP archive, by name.
pub fn read_archive(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        entries.insert(file.name().to_string(), content);
    }
    entries
}

/// `word/document.xml` of a DOCX package.
pub fn document_xml(docx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

// ── Fake capabilities ────────────────────────────────────────────────────────

/// Treats the input bytes as UTF-8 text. Inputs starting with `corrupt`
/// fail, inputs starting with `panic` panic, inputs starting with `slow`
/// sleep for two seconds first.
pub struct ScriptedExtractor;

impl TextExtractor for ScriptedExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, BoxError> {
        let text = String::from_utf8(bytes.to_vec())?;
        if text.starts_with("corrupt") {
            return Err("Invalid PDF structure".into());
        }
        if text.starts_with("panic") {
            panic!("extractor blew up");
        }
        if text.starts_with("slow") {
            std::thread::sleep(Duration::from_secs(2));
        }
        Ok(text)
    }
}

/// Writes `<paragraph count>\n<paragraph>\n…` as plain text.
pub struct PlainSerializer;

impl DocumentSerializer for PlainSerializer {
    fn serialize(&self, document: &StructuredDocument) -> Result<Vec<u8>, BoxError> {
        let mut out = format!("{}\n", document.paragraph_count());
        for p in &document.paragraphs {
            out.push_str(&p.text);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }

    fn extension(&self) -> &str {
        ".txt"
    }
}

/// Always fails.
pub struct BrokenSerializer;

impl DocumentSerializer for BrokenSerializer {
    fn serialize(&self, _document: &StructuredDocument) -> Result<Vec<u8>, BoxError> {
        Err("writer unavailable".into())
    }
}
