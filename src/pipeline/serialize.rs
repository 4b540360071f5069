//! DOCX serialization: `StructuredDocument` → `.docx` bytes.
//!
//! Like extraction, the writer is a pluggable capability
//! ([`DocumentSerializer`]). The default, [`DocxSerializer`], emits one Word
//! paragraph holding one plain run per model paragraph. No styles, fonts or
//! page layout are carried over.

use crate::error::{BoxError, DocumentError};
use crate::pipeline::model::StructuredDocument;
use std::io::Cursor;
use tracing::debug;

/// A capability that turns the paragraph model into target-format bytes.
///
/// Implementations are called from `spawn_blocking`.
pub trait DocumentSerializer: Send + Sync {
    fn serialize(&self, document: &StructuredDocument) -> Result<Vec<u8>, BoxError>;

    /// File extension (with leading dot) of the produced artifact.
    fn extension(&self) -> &str {
        ".docx"
    }
}

/// Serialize `document`, mapping any backend failure to
/// [`DocumentError::Serialization`].
pub fn serialize_document(
    serializer: &dyn DocumentSerializer,
    document: &StructuredDocument,
) -> Result<Vec<u8>, DocumentError> {
    let bytes = serializer
        .serialize(document)
        .map_err(DocumentError::serialization)?;
    debug!(
        "Serialized {} paragraphs → {} bytes",
        document.paragraph_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// Default serializer backed by `docx-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxSerializer;

impl DocumentSerializer for DocxSerializer {
    fn serialize(&self, document: &StructuredDocument) -> Result<Vec<u8>, BoxError> {
        let docx = document
            .paragraphs
            .iter()
            .fold(docx_rs::Docx::new(), |docx, para| {
                let mut p = docx_rs::Paragraph::new();
                if !para.text.is_empty() {
                    p = p.add_run(docx_rs::Run::new().add_text(para.text.as_str()));
                }
                docx.add_paragraph(p)
            });

        let mut cursor = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut cursor)
            .map_err(|e| format!("Failed to pack DOCX: {e}"))?;
        Ok(cursor.into_inner())
    }
}
