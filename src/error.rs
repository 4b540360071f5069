//! Error types for the edgequake-pdf2docx library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2DocxError`] — **Fatal**: the batch cannot proceed at all
//!   (no documents, an oversized upload, the archive cannot be written).
//!   Returned as `Err(Pdf2DocxError)` from the top-level `convert*` functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document failed (corrupt
//!   PDF, serializer failure) but every other document in the batch is fine.
//!   Stored inside [`crate::output::ConversionOutcome`] and written to the
//!   archive as a `.error.txt` entry rather than aborting the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by the pluggable extraction and serialization
/// capabilities. Adapters turn it into a [`DocumentError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// All fatal errors returned by the edgequake-pdf2docx library.
///
/// Document-level failures use [`DocumentError`] and are stored in
/// [`crate::output::ConversionOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2DocxError {
    // ── Input validation ──────────────────────────────────────────────────
    /// The batch contained no documents.
    #[error("No files uploaded")]
    NoDocuments,

    /// A single document exceeded the configured size ceiling.
    #[error("File '{name}' is {size} bytes, exceeding the {limit}-byte limit")]
    DocumentTooLarge { name: String, size: u64, limit: u64 },

    // ── Input resolution ──────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Archive ───────────────────────────────────────────────────────────
    /// The ZIP container could not be finalised. No partial archive exists.
    #[error("Failed to finalise archive: {detail}")]
    ArchiveFinalization { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output archive file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2DocxError {
    /// `true` for errors caused by the caller's input rather than by the
    /// service itself. The HTTP layer maps these to 4xx responses.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Pdf2DocxError::NoDocuments
                | Pdf2DocxError::DocumentTooLarge { .. }
                | Pdf2DocxError::FileNotFound { .. }
                | Pdf2DocxError::PermissionDenied { .. }
                | Pdf2DocxError::InvalidInput { .. }
                | Pdf2DocxError::InvalidConfig(_)
        )
    }
}

/// A non-fatal error for a single document.
///
/// The batch continues; the archive receives a diagnostic entry in place of
/// the converted document.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The PDF could not be read or its text could not be extracted.
    #[error("{cause}")]
    Extraction { cause: String },

    /// The DOCX writer failed.
    #[error("{cause}")]
    Serialization { cause: String },
}

impl DocumentError {
    pub fn extraction(cause: impl std::fmt::Display) -> Self {
        DocumentError::Extraction {
            cause: cause.to_string(),
        }
    }

    pub fn serialization(cause: impl std::fmt::Display) -> Self {
        DocumentError::Serialization {
            cause: cause.to_string(),
        }
    }

    /// Short label of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            DocumentError::Extraction { .. } => "extraction",
            DocumentError::Serialization { .. } => "serialization",
        }
    }
}
