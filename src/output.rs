//! Batch input and output types.
//!
//! One [`InputDocument`] goes in, exactly one [`ConversionOutcome`] comes
//! out, and every outcome becomes exactly one archive entry.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source extension stripped from successful entry names.
pub const SOURCE_EXTENSION: &str = ".pdf";

/// Suffix appended to the full source name for failed documents.
pub const ERROR_SUFFIX: &str = ".error.txt";

/// Fallback name for documents uploaded without a usable file name.
pub const DEFAULT_DOCUMENT_NAME: &str = "document";

/// One document of a batch: its original file name and raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// Original file name. Unique only by convention.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for InputDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDocument")
            .field("name", &self.name)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// An archive entry name split into a stem and a fixed suffix.
///
/// Collisions are resolved by editing the stem only, so the suffix
/// (`.docx`, `.error.txt`) is always preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryName {
    pub stem: String,
    pub suffix: String,
}

impl EntryName {
    /// Name for a converted document: source extension replaced by
    /// `target_extension`.
    pub fn success(source_name: &str, target_extension: &str) -> Self {
        let base = base_name(source_name);
        let stem = strip_suffix_ignore_case(base, SOURCE_EXTENSION)
            .filter(|s| !s.is_empty())
            .unwrap_or(base);
        Self {
            stem: stem.to_string(),
            suffix: target_extension.to_string(),
        }
    }

    /// Name for a failed document: the full source name plus `.error.txt`.
    pub fn failure(source_name: &str) -> Self {
        Self {
            stem: base_name(source_name).to_string(),
            suffix: ERROR_SUFFIX.to_string(),
        }
    }

    /// The name with `-{n}` inserted before the suffix.
    pub fn numbered(&self, n: usize) -> String {
        format!("{}-{}{}", self.stem, n, self.suffix)
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.suffix)
    }
}

/// Final path component of an uploaded file name.
///
/// Browsers and CLI users may send `dir/a.pdf` or `C:\dir\a.pdf`; only the
/// last component is used so no entry can land outside the archive root.
fn base_name(name: &str) -> &str {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name).trim();
    match base {
        "" | "." | ".." => DEFAULT_DOCUMENT_NAME,
        b => b,
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Terminal state of one document's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Succeeded {
        artifact: Vec<u8>,
        paragraph_count: usize,
    },
    Failed {
        error: DocumentError,
        /// Human-readable text written to the `.error.txt` entry.
        diagnostic: String,
    },
}

/// Result of converting one [`InputDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// Position of the document in the submitted batch.
    pub index: usize,
    pub source_name: String,
    /// Entry name before collision handling.
    pub entry_name: EntryName,
    pub kind: OutcomeKind,
}

impl ConversionOutcome {
    pub fn success(
        index: usize,
        source_name: impl Into<String>,
        target_extension: &str,
        artifact: Vec<u8>,
        paragraph_count: usize,
    ) -> Self {
        let source_name = source_name.into();
        Self {
            index,
            entry_name: EntryName::success(&source_name, target_extension),
            source_name,
            kind: OutcomeKind::Succeeded {
                artifact,
                paragraph_count,
            },
        }
    }

    pub fn failure(index: usize, source_name: impl Into<String>, error: DocumentError) -> Self {
        let source_name = source_name.into();
        Self {
            index,
            entry_name: EntryName::failure(&source_name),
            source_name,
            kind: OutcomeKind::Failed {
                diagnostic: format!("Conversion failed: {error}"),
                error,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Succeeded { .. })
    }

    /// Bytes stored in the archive for this outcome.
    pub fn entry_bytes(&self) -> &[u8] {
        match &self.kind {
            OutcomeKind::Succeeded { artifact, .. } => artifact,
            OutcomeKind::Failed { diagnostic, .. } => diagnostic.as_bytes(),
        }
    }

    pub fn error(&self) -> Option<&DocumentError> {
        match &self.kind {
            OutcomeKind::Succeeded { .. } => None,
            OutcomeKind::Failed { error, .. } => Some(error),
        }
    }
}

/// One entry of a finalised archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Name inside the archive, after collision handling.
    pub name: String,
    pub source_name: String,
    pub size: u64,
    pub success: bool,
}

/// Batch-level statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_documents: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Size of the finalised ZIP archive in bytes.
    pub archive_bytes: u64,
    pub conversion_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The finished batch: archive bytes plus what went into them.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub archive: Vec<u8>,
    pub entries: Vec<ArchiveEntry>,
    pub stats: BatchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_name_replaces_pdf_extension() {
        assert_eq!(EntryName::success("a.pdf", ".docx").to_string(), "a.docx");
        assert_eq!(
            EntryName::success("Report.PDF", ".docx").to_string(),
            "Report.docx"
        );
        assert_eq!(
            EntryName::success("archive.tar.pdf", ".docx").to_string(),
            "archive.tar.docx"
        );
    }

    #[test]
    fn success_name_without_pdf_extension_appends() {
        assert_eq!(EntryName::success("notes", ".docx").to_string(), "notes.docx");
        assert_eq!(
            EntryName::success("scan.png", ".docx").to_string(),
            "scan.png.docx"
        );
    }

    #[test]
    fn bare_extension_keeps_the_name() {
        assert_eq!(EntryName::success(".pdf", ".docx").to_string(), ".pdf.docx");
    }

    #[test]
    fn failure_name_keeps_full_source_name() {
        assert_eq!(
            EntryName::failure("bad.pdf").to_string(),
            "bad.pdf.error.txt"
        );
    }

    #[test]
    fn directories_are_stripped() {
        assert_eq!(
            EntryName::success("../../etc/a.pdf", ".docx").to_string(),
            "a.docx"
        );
        assert_eq!(
            EntryName::failure("C:\\Users\\me\\b.pdf").to_string(),
            "b.pdf.error.txt"
        );
        assert_eq!(
            EntryName::success("", ".docx").to_string(),
            "document.docx"
        );
        assert_eq!(EntryName::failure("dir/").to_string(), "document.error.txt");
    }

    #[test]
    fn numbered_inserts_before_suffix() {
        let name = EntryName::failure("x.pdf");
        assert_eq!(name.numbered(2), "x.pdf-2.error.txt");
    }

    #[test]
    fn non_ascii_names_do_not_panic() {
        assert_eq!(
            EntryName::success("résumé.pdf", ".docx").to_string(),
            "résumé.docx"
        );
        assert_eq!(EntryName::success("日本", ".docx").to_string(), "日本.docx");
    }

    #[test]
    fn failure_outcome_carries_diagnostic() {
        let o = ConversionOutcome::failure(0, "bad.pdf", DocumentError::extraction("bad xref"));
        assert!(!o.is_success());
        assert_eq!(o.entry_bytes(), b"Conversion failed: bad xref");
        assert_eq!(o.error(), Some(&DocumentError::extraction("bad xref")));
    }
}
