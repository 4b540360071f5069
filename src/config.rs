//! Configuration types for batch PDF-to-DOCX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The HTTP boundary adds its own knobs
//! in [`ServerConfig`]; the library never reads the environment itself.

use crate::error::Pdf2DocxError;
use crate::pipeline::extract::{PdfTextExtractor, TextExtractor};
use crate::pipeline::serialize::{DocumentSerializer, DocxSerializer};
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Largest accepted single document: 100 MiB.
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 100 * 1024 * 1024;

/// Configuration for a batch conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2docx::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .concurrency(8)
///     .document_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Maximum number of documents converted at the same time.
    ///
    /// `None` (default) starts every document of the batch at once. Set a
    /// ceiling on shared hosts where a large upload could otherwise occupy
    /// every blocking thread.
    pub concurrency: Option<usize>,

    /// Wall-clock budget per document, covering extraction and
    /// serialization. `None` (default) waits indefinitely.
    ///
    /// An expired budget turns the document into a failure entry; the rest
    /// of the batch is unaffected.
    pub document_timeout_secs: Option<u64>,

    /// Size ceiling for a single input document in bytes. Default: 100 MiB.
    pub max_document_bytes: u64,

    /// Size ceiling for the finished ZIP in bytes. `None` (default) means
    /// no ceiling.
    ///
    /// Growing past it aborts finalization; no partial archive is returned.
    pub max_archive_bytes: Option<u64>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Text extraction backend. Default: [`PdfTextExtractor`].
    pub extractor: Option<Arc<dyn TextExtractor>>,

    /// DOCX writer. Default: [`DocxSerializer`].
    pub serializer: Option<Arc<dyn DocumentSerializer>>,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            document_timeout_secs: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_archive_bytes: None,
            download_timeout_secs: 120,
            extractor: None,
            serializer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("concurrency", &self.concurrency)
            .field("document_timeout_secs", &self.document_timeout_secs)
            .field("max_document_bytes", &self.max_document_bytes)
            .field("max_archive_bytes", &self.max_archive_bytes)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "extractor",
                &self.extractor.as_ref().map(|_| "<dyn TextExtractor>"),
            )
            .field(
                "serializer",
                &self.serializer.as_ref().map(|_| "<dyn DocumentSerializer>"),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The configured extractor, or the `lopdf` default.
    pub fn extractor(&self) -> Arc<dyn TextExtractor> {
        self.extractor
            .clone()
            .unwrap_or_else(|| Arc::new(PdfTextExtractor))
    }

    /// The configured serializer, or the `docx-rs` default.
    pub fn serializer(&self) -> Arc<dyn DocumentSerializer> {
        self.serializer
            .clone()
            .unwrap_or_else(|| Arc::new(DocxSerializer))
    }

    /// In-flight document limit for a batch of `batch_size` documents.
    pub fn effective_concurrency(&self, batch_size: usize) -> usize {
        self.concurrency.unwrap_or(batch_size).max(1)
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = Some(n);
        self
    }

    pub fn unbounded_concurrency(mut self) -> Self {
        self.config.concurrency = None;
        self
    }

    pub fn document_timeout_secs(mut self, secs: u64) -> Self {
        self.config.document_timeout_secs = Some(secs);
        self
    }

    pub fn max_document_bytes(mut self, bytes: u64) -> Self {
        self.config.max_document_bytes = bytes;
        self
    }

    pub fn max_archive_bytes(mut self, bytes: u64) -> Self {
        self.config.max_archive_bytes = Some(bytes);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn serializer(mut self, serializer: Arc<dyn DocumentSerializer>) -> Self {
        self.config.serializer = Some(serializer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2DocxError> {
        let c = &self.config;
        if c.concurrency == Some(0) {
            return Err(Pdf2DocxError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.document_timeout_secs == Some(0) {
            return Err(Pdf2DocxError::InvalidConfig(
                "Document timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_document_bytes == 0 {
            return Err(Pdf2DocxError::InvalidConfig(
                "Maximum document size must be ≥ 1 byte".into(),
            ));
        }
        if c.max_archive_bytes == Some(0) {
            return Err(Pdf2DocxError::InvalidConfig(
                "Maximum archive size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Settings of the HTTP boundary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on. Default: `0.0.0.0:3000`.
    pub bind_addr: String,

    /// Multipart field carrying the documents. Default: `files`.
    pub field_name: String,

    /// File name offered to the browser. Default: `converted_files.zip`.
    pub download_name: String,

    /// Directory receiving a best-effort copy of every archive.
    /// `None` disables the copy. Default: `/app/converted_files`.
    pub persist_dir: Option<PathBuf>,

    /// Ceiling for a whole request body. Default: 1 GiB.
    pub max_request_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            field_name: "files".to_string(),
            download_name: "converted_files.zip".to_string(),
            persist_dir: Some(PathBuf::from("/app/converted_files")),
            max_request_bytes: 1024 * 1024 * 1024,
        }
    }
}
