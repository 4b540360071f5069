//! Streaming conversion API: emit outcomes as documents complete.
//!
//! Unlike the eager [`crate::convert::convert_to_archive`], which returns only
//! after every document finishes, [`convert_stream`] yields one
//! [`ConversionOutcome`] per document via a `Stream`. Outcomes arrive in
//! completion order; each carries its submission `index`. Feed them to an
//! [`crate::archive::ArchiveAssembler`] (via
//! [`ArchiveAssembler::from_outcomes`](crate::archive::ArchiveAssembler::from_outcomes))
//! to get the same archive the eager API builds.

use crate::config::ConversionConfig;
use crate::convert::{convert_indexed, validate_batch};
use crate::error::Pdf2DocxError;
use crate::output::{ConversionOutcome, InputDocument};
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-document outcomes.
pub type OutcomeStream = Pin<Box<dyn Stream<Item = ConversionOutcome> + Send>>;

/// Convert a batch, streaming each document's outcome as it is ready.
///
/// Progress callbacks fire per document; `on_batch_start` and
/// `on_batch_complete` are not emitted because the caller owns the stream.
///
/// # Errors
/// The same pre-flight errors as [`crate::convert::convert_batch`]. Once the
/// stream is returned it always yields exactly one item per document.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2docx::{convert_stream, ConversionConfig, InputDocument};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let docs = vec![
///     InputDocument::new("a.pdf", std::fs::read("a.pdf")?),
///     InputDocument::new("b.pdf", std::fs::read("b.pdf")?),
/// ];
/// let mut stream = convert_stream(docs, &ConversionConfig::default()).await?;
/// while let Some(outcome) = stream.next().await {
///     println!("#{} {} → {}", outcome.index, outcome.source_name, outcome.is_success());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn convert_stream(
    documents: Vec<InputDocument>,
    config: &ConversionConfig,
) -> Result<OutcomeStream, Pdf2DocxError> {
    validate_batch(&documents, config)?;

    let total = documents.len();
    let limit = config.effective_concurrency(total);
    info!("Starting streaming batch: {} documents", total);

    let config_clone = config.clone();
    let s = stream::iter(documents.into_iter().enumerate().map(move |(index, doc)| {
        let cfg = config_clone.clone();
        async move { convert_indexed(index, total, doc, &cfg).await }
    }))
    .buffer_unordered(limit);

    Ok(Box::pin(s))
}
