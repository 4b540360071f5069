//! Best-effort durable copy of every produced archive.
//!
//! The HTTP handler hands the finished archive to [`spawn_persist`] and
//! replies immediately; the copy is written in the background and failures
//! are only logged. Files are written to a temp file in the target directory
//! and renamed into place, so a reader never sees a half-written archive.

use crate::error::Pdf2DocxError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// `converted_files_<timestamp>.zip`, with `:` replaced so the name is valid
/// on every filesystem. Example: `converted_files_2024-05-01T12-30-45.123Z.zip`.
pub fn archive_file_name(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("converted_files_{stamp}.zip")
}

/// Write `archive` into `dir` atomically and return the final path.
pub fn persist_archive(
    archive: &[u8],
    dir: &Path,
    at: DateTime<Utc>,
) -> Result<PathBuf, Pdf2DocxError> {
    let path = dir.join(archive_file_name(at));
    let write_err = |source: std::io::Error| Pdf2DocxError::OutputWriteFailed {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(archive).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&path).map_err(|e| write_err(e.error))?;

    Ok(path)
}

/// Persist a copy of `archive` in the background.
///
/// The returned handle resolves once the write finished or failed; callers
/// serving a response simply drop it.
pub fn spawn_persist(archive: Vec<u8>, dir: PathBuf) -> JoinHandle<()> {
    let at = Utc::now();
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || persist_archive(&archive, &dir, at)).await;
        match result {
            Ok(Ok(path)) => info!("Archive saved to {}", path.display()),
            Ok(Err(e)) => error!("Error saving zip file: {}", e),
            Err(e) => error!("Error saving zip file: task failed: {}", e),
        }
    })
}
