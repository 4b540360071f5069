//! # edgequake-pdf2docx
//!
//! Batch-convert PDF documents to Word (`.docx`) and package the results into
//! a single ZIP archive.
//!
//! Every input produces exactly one archive entry: `<stem>.docx` on success,
//! `<original name>.error.txt` carrying a diagnostic on failure. One bad file
//! never takes the rest of the batch down with it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Input      resolve local files / URLs, or receive an upload
//!  ├─ 2. Extract    text via lopdf (CPU-bound, spawn_blocking)
//!  ├─ 3. Normalize  split into lines, strip control characters
//!  ├─ 4. Build      one paragraph per line
//!  ├─ 5. Serialize  paragraphs → .docx via docx-rs (spawn_blocking)
//!  └─ 6. Archive    outcomes sorted by submission order → ZIP
//! ```
//!
//! Steps 2–5 run concurrently for every document of the batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2docx::{convert_files, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_files(&["a.pdf", "b.pdf"], &config).await?;
//!     std::fs::write("converted_files.zip", &output.archive)?;
//!     eprintln!("{}/{} converted", output.stats.succeeded, output.stats.total_documents);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `pdf2docx` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `server` | on      | HTTP upload service (axum + tower-http) |
//!
//! Disable both when using only the library:
//! ```toml
//! edgequake-pdf2docx = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod archive;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod persist;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "server")]
pub mod server;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use archive::ArchiveAssembler;
pub use config::{ConversionConfig, ConversionConfigBuilder, ServerConfig};
pub use convert::{
    convert_batch, convert_document, convert_files, convert_sync, convert_to_archive,
    convert_to_file, PipelineStage,
};
pub use error::{BoxError, DocumentError, Pdf2DocxError};
pub use output::{
    ArchiveEntry, BatchOutput, BatchStats, ConversionOutcome, EntryName, InputDocument,
    OutcomeKind,
};
pub use pipeline::extract::{PdfTextExtractor, TextExtractor};
pub use pipeline::serialize::{DocumentSerializer, DocxSerializer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, OutcomeStream};
