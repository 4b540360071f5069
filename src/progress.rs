//! Progress-callback trait for per-document conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch processes each document.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2docx::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, _index: usize, name: &str, _total: usize, docx_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{name} done ({docx_len} bytes)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch pipeline as it processes each document.
///
/// Documents are converted concurrently, so `on_document_*` may be called
/// from several threads at once and in any order. Implementations must
/// protect shared mutable state (`Mutex`, atomics). All methods default to
/// no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any document starts.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called when a document's pipeline starts extracting.
    ///
    /// `index` is the document's position in the submitted batch. Names may
    /// repeat within a batch; indices never do.
    fn on_document_start(&self, index: usize, name: &str, total_documents: usize) {
        let _ = (index, name, total_documents);
    }

    /// Called when a document converted successfully.
    ///
    /// # Arguments
    /// * `name`: original file name
    /// * `docx_len`: byte length of the produced DOCX
    fn on_document_complete(
        &self,
        index: usize,
        name: &str,
        total_documents: usize,
        docx_len: usize,
    ) {
        let _ = (index, name, total_documents, docx_len);
    }

    /// Called when a document failed; `error` is its diagnostic text.
    fn on_document_error(&self, index: usize, name: &str, total_documents: usize, error: &str) {
        let _ = (index, name, total_documents, error);
    }

    /// Called once after every document reached a terminal state.
    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let _ = (total_documents, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
