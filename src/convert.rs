//! Batch conversion entry points.
//!
//! ## Failure isolation
//!
//! Every document runs its own pipeline. Whatever goes wrong inside one
//! (corrupt PDF, writer error, timeout, even a panic in a backend) becomes a
//! failure [`ConversionOutcome`] for that document only. Siblings are never
//! cancelled and the batch always waits for every document before building
//! the archive. The only batch-level errors are an empty batch, an oversized
//! input, and a failure to finalise the archive.
//!
//! Use [`crate::stream::convert_stream`] instead when outcomes should be
//! observed as they complete.

use crate::archive::ArchiveAssembler;
use crate::config::ConversionConfig;
use crate::error::{DocumentError, Pdf2DocxError};
use crate::output::{BatchOutput, BatchStats, ConversionOutcome, InputDocument, OutcomeKind};
use crate::pipeline::{extract, input, model, serialize};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Lifecycle of one document's pipeline.
///
/// `Succeeded` and `Failed` are terminal. `Building` cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Pending,
    Extracting,
    Building,
    Serializing,
    Succeeded,
    Failed,
}

impl PipelineStage {
    fn error(self, cause: impl std::fmt::Display) -> DocumentError {
        match self {
            PipelineStage::Serializing => DocumentError::serialization(cause),
            _ => DocumentError::extraction(cause),
        }
    }
}

/// Convert a batch of PDFs and package every outcome into a ZIP archive.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BatchOutput)` whenever the archive could be built, even if some or
/// all documents failed (check `output.stats.failed`). Failed documents are
/// present in the archive as `<name>.error.txt`.
///
/// # Errors
/// - [`Pdf2DocxError::NoDocuments`] for an empty batch
/// - [`Pdf2DocxError::DocumentTooLarge`] for an input above the ceiling
/// - [`Pdf2DocxError::ArchiveFinalization`] if the ZIP cannot be written or
///   outgrows [`ConversionConfig::max_archive_bytes`]
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2docx::{convert_to_archive, ConversionConfig, InputDocument};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let docs = vec![InputDocument::new("report.pdf", std::fs::read("report.pdf")?)];
/// let output = convert_to_archive(docs, &ConversionConfig::default()).await?;
/// std::fs::write("converted_files.zip", &output.archive)?;
/// # Ok(())
/// # }
/// ```
pub async fn convert_to_archive(
    documents: Vec<InputDocument>,
    config: &ConversionConfig,
) -> Result<BatchOutput, Pdf2DocxError> {
    let total_start = Instant::now();

    let outcomes = convert_batch(documents, config).await?;
    let conversion_duration_ms = total_start.elapsed().as_millis() as u64;

    let total_documents = outcomes.len();
    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();

    let assembler = ArchiveAssembler::from_outcomes(outcomes);
    let entries = assembler.entries();
    let max_archive_bytes = config.max_archive_bytes;
    let archive = tokio::task::spawn_blocking(move || assembler.finalize_capped(max_archive_bytes))
        .await
        .map_err(|e| Pdf2DocxError::ArchiveFinalization {
            detail: format!("archive task panicked: {e}"),
        })??;

    let stats = BatchStats {
        total_documents,
        succeeded,
        failed: total_documents - succeeded,
        archive_bytes: archive.len() as u64,
        conversion_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} documents converted, {} byte archive, {}ms total",
        stats.succeeded, stats.total_documents, stats.archive_bytes, stats.total_duration_ms
    );

    Ok(BatchOutput {
        archive,
        entries,
        stats,
    })
}

/// Run one pipeline per document concurrently and collect every outcome.
///
/// Returns exactly one outcome per input, in completion order. Each outcome
/// carries its submission `index`.
pub async fn convert_batch(
    documents: Vec<InputDocument>,
    config: &ConversionConfig,
) -> Result<Vec<ConversionOutcome>, Pdf2DocxError> {
    validate_batch(&documents, config)?;

    let total = documents.len();
    let limit = config.effective_concurrency(total);
    info!(
        "Starting batch: {} documents, up to {} in flight",
        total, limit
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let outcomes: Vec<ConversionOutcome> =
        stream::iter(documents.into_iter().enumerate().map(|(index, doc)| {
            let cfg = config.clone();
            async move { convert_indexed(index, total, doc, &cfg).await }
        }))
        .buffer_unordered(limit)
        .collect()
        .await;

    let success_count = outcomes.iter().filter(|o| o.is_success()).count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, success_count);
    }

    Ok(outcomes)
}

/// Pre-flight checks shared by the eager and streaming APIs.
pub(crate) fn validate_batch(
    documents: &[InputDocument],
    config: &ConversionConfig,
) -> Result<(), Pdf2DocxError> {
    if documents.is_empty() {
        return Err(Pdf2DocxError::NoDocuments);
    }
    for doc in documents {
        input::check_size(&doc.name, doc.bytes.len() as u64, config.max_document_bytes)?;
    }
    Ok(())
}

/// Convert a single document. Never fails: errors become a failure outcome.
pub async fn convert_document(
    index: usize,
    document: InputDocument,
    config: &ConversionConfig,
) -> ConversionOutcome {
    convert_indexed(index, 1, document, config).await
}

/// [`convert_document`] as one of `total` documents in a batch.
pub(crate) async fn convert_indexed(
    index: usize,
    total: usize,
    document: InputDocument,
    config: &ConversionConfig,
) -> ConversionOutcome {
    let InputDocument { name, bytes } = document;
    let started = Instant::now();
    debug!("{}: {:?}", name, PipelineStage::Pending);

    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(index, &name, total);
    }

    match run_pipeline(&name, bytes, config).await {
        Ok((artifact, paragraph_count)) => {
            debug!(
                "{}: {:?} in {}ms ({} paragraphs)",
                name,
                PipelineStage::Succeeded,
                started.elapsed().as_millis(),
                paragraph_count
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_complete(index, &name, total, artifact.len());
            }
            ConversionOutcome::success(
                index,
                name,
                config.serializer().extension(),
                artifact,
                paragraph_count,
            )
        }
        Err(error) => {
            warn!(
                "Failed to convert file: {} ({} error: {})",
                name,
                error.stage(),
                error
            );
            debug!("{}: {:?}", name, PipelineStage::Failed);
            let outcome = ConversionOutcome::failure(index, name, error);
            if let (Some(cb), OutcomeKind::Failed { diagnostic, .. }) =
                (config.progress_callback.as_ref(), &outcome.kind)
            {
                cb.on_document_error(index, &outcome.source_name, total, diagnostic);
            }
            outcome
        }
    }
}

/// Extracting → Building → Serializing for one document.
async fn run_pipeline(
    name: &str,
    bytes: Vec<u8>,
    config: &ConversionConfig,
) -> Result<(Vec<u8>, usize), DocumentError> {
    let budget = config.document_timeout_secs.map(Duration::from_secs);
    // A budget too large to represent as an instant means no deadline.
    let deadline = budget.and_then(|b| tokio::time::Instant::now().checked_add(b));

    debug!("{}: {:?}", name, PipelineStage::Extracting);
    let extractor = config.extractor();
    let text = run_blocking(PipelineStage::Extracting, deadline, budget, move || {
        extract::extract_lines(extractor.as_ref(), &bytes)
    })
    .await?;

    debug!("{}: {:?} ({} lines)", name, PipelineStage::Building, text.len());
    let document = model::build_document(&text);
    drop(text);

    debug!("{}: {:?}", name, PipelineStage::Serializing);
    let paragraph_count = document.paragraph_count();
    let serializer = config.serializer();
    let artifact = run_blocking(PipelineStage::Serializing, deadline, budget, move || {
        serialize::serialize_document(serializer.as_ref(), &document)
    })
    .await?;

    Ok((artifact, paragraph_count))
}

/// Run a CPU-bound stage on the blocking pool, honouring the deadline.
///
/// A timed-out stage keeps running on its blocking thread until it returns;
/// its result is discarded.
async fn run_blocking<T, F>(
    stage: PipelineStage,
    deadline: Option<tokio::time::Instant>,
    budget: Option<Duration>,
    f: F,
) -> Result<T, DocumentError>
where
    F: FnOnce() -> Result<T, DocumentError> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(f);
    let joined = match (deadline, budget) {
        (Some(deadline), Some(budget)) => {
            match tokio::time::timeout_at(deadline, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    return Err(stage.error(format!(
                        "timed out after {}s",
                        budget.as_secs()
                    )))
                }
            }
        }
        _ => handle.await,
    };
    joined.map_err(|e| stage.error(format!("{:?} task panicked: {e}", stage)))?
}

/// Resolve local paths / URLs, convert them, and return the archive.
pub async fn convert_files<S: AsRef<str>>(
    inputs: &[S],
    config: &ConversionConfig,
) -> Result<BatchOutput, Pdf2DocxError> {
    let documents = input::resolve_inputs(inputs, config).await?;
    convert_to_archive(documents, config).await
}

/// Convert inputs and write the archive directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file<S: AsRef<str>>(
    inputs: &[S],
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchOutput, Pdf2DocxError> {
    let output = convert_files(inputs, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Pdf2DocxError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("zip.tmp");
    tokio::fs::write(&tmp_path, &output.archive)
        .await
        .map_err(|e| Pdf2DocxError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2DocxError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

/// Synchronous wrapper around [`convert_to_archive`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    documents: Vec<InputDocument>,
    config: &ConversionConfig,
) -> Result<BatchOutput, Pdf2DocxError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2DocxError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_to_archive(documents, config))
}
