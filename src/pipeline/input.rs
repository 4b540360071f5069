//! Input resolution: turn user-supplied paths or URLs into [`InputDocument`]s.
//!
//! Only *access* problems are fatal here (missing file, no permission,
//! failed download, size ceiling). Whether the bytes are a readable PDF is
//! decided later by extraction, so a non-PDF input becomes a failure entry in
//! the archive instead of aborting the whole batch.

use crate::config::ConversionConfig;
use crate::error::Pdf2DocxError;
use crate::output::{InputDocument, DEFAULT_DOCUMENT_NAME};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Reject documents above the configured size ceiling.
pub fn check_size(name: &str, size: u64, limit: u64) -> Result<(), Pdf2DocxError> {
    if size > limit {
        return Err(Pdf2DocxError::DocumentTooLarge {
            name: name.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

/// Resolve every input, failing on the first inaccessible one.
pub async fn resolve_inputs<S: AsRef<str>>(
    inputs: &[S],
    config: &ConversionConfig,
) -> Result<Vec<InputDocument>, Pdf2DocxError> {
    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        documents.push(resolve_input(input.as_ref(), config).await?);
    }
    Ok(documents)
}

/// Resolve one local path or HTTP/HTTPS URL into an in-memory document.
pub async fn resolve_input(
    input: &str,
    config: &ConversionConfig,
) -> Result<InputDocument, Pdf2DocxError> {
    if input.trim().is_empty() {
        return Err(Pdf2DocxError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, config).await
    } else {
        read_local(Path::new(input), config.max_document_bytes).await
    }
}

async fn read_local(path: &Path, limit: u64) -> Result<InputDocument, Pdf2DocxError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;
    if !metadata.is_file() {
        return Err(Pdf2DocxError::InvalidInput {
            input: path.display().to_string(),
        });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string());
    check_size(&name, metadata.len(), limit)?;

    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(InputDocument::new(name, bytes))
}

fn io_error(path: &Path, e: std::io::Error) -> Pdf2DocxError {
    let path: PathBuf = path.to_path_buf();
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => Pdf2DocxError::PermissionDenied { path },
        _ => Pdf2DocxError::FileNotFound { path },
    }
}

/// Download a URL into memory.
async fn download_url(url: &str, config: &ConversionConfig) -> Result<InputDocument, Pdf2DocxError> {
    info!("Downloading PDF from: {}", url);
    let timeout_secs = config.download_timeout_secs;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2DocxError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Pdf2DocxError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2DocxError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Pdf2DocxError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let name = filename_from_url(url);
    if let Some(len) = response.content_length() {
        check_size(&name, len, config.max_document_bytes)?;
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2DocxError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    check_size(&name, bytes.len() as u64, config.max_document_bytes)?;

    info!("Downloaded {} ({} bytes)", name, bytes.len());
    Ok(InputDocument::new(name, bytes.to_vec()))
}

/// Last non-empty URL path segment, or `downloaded.pdf`.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}
