//! Text extraction: raw PDF bytes → ordered lines.
//!
//! The extraction backend sits behind the [`TextExtractor`] trait so the
//! batch pipeline can be exercised with fakes and the backend can be swapped
//! without touching any other stage. The default backend,
//! [`PdfTextExtractor`], is built on `lopdf` and needs no native library.
//!
//! Whatever the backend reports as an error becomes
//! [`DocumentError::Extraction`]. An error is never downgraded to an empty
//! result: a document that yields no text because the backend failed must
//! end up as a failure entry, not as an empty `.docx`.

use crate::error::{BoxError, DocumentError};
use crate::pipeline::model::ExtractedText;
use crate::pipeline::normalize;
use tracing::debug;

/// A capability that turns PDF bytes into plain text.
///
/// Implementations are called from `spawn_blocking` and may be CPU-heavy.
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text, lines separated by `\n`.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, BoxError>;
}

/// Run `extractor` over `bytes` and split the result into lines.
pub fn extract_lines(
    extractor: &dyn TextExtractor,
    bytes: &[u8],
) -> Result<ExtractedText, DocumentError> {
    let text = extractor
        .extract_text(bytes)
        .map_err(DocumentError::extraction)?;
    let lines = normalize::split_lines(&text);
    debug!("Extracted {} chars → {} lines", text.len(), lines.len());
    Ok(ExtractedText::new(lines))
}

/// Default extractor backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, BoxError> {
        if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
            let magic: Vec<u8> = bytes.iter().take(4).copied().collect();
            return Err(format!("File is not a valid PDF (first bytes: {magic:?})").into());
        }

        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| format!("Failed to parse PDF: {e}"))?;

        // BTreeMap keys: already in page order.
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();

        let mut text = String::new();
        for page in &pages {
            let page_text = doc
                .extract_text(&[*page])
                .map_err(|e| format!("Failed to extract text from page {page}: {e}"))?;
            text.push_str(&page_text);
            if !page_text.is_empty() && !page_text.ends_with('\n') {
                text.push('\n');
            }
        }

        debug!("lopdf: {} pages, {} chars", pages.len(), text.len());
        Ok(text)
    }
}
