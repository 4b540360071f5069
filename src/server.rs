//! HTTP boundary: upload PDFs, receive a ZIP.
//!
//! | Route               | Behaviour                                            |
//! |---------------------|------------------------------------------------------|
//! | `POST /api/convert` | multipart field `files` (repeatable) → `application/zip` |
//! | `GET /health`       | `{"status":"ok"}`                                    |
//!
//! Uploads are buffered in memory. Each part is checked against
//! [`ConversionConfig::max_document_bytes`] while its chunks arrive, so an
//! oversized file is rejected with `413` without reading it to the end.

use crate::config::{ConversionConfig, ServerConfig};
use crate::convert::convert_to_archive;
use crate::error::Pdf2DocxError;
use crate::output::{InputDocument, DEFAULT_DOCUMENT_NAME};
use crate::persist::spawn_persist;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared state of the HTTP service.
#[derive(Debug, Clone)]
pub struct AppState {
    pub conversion: ConversionConfig,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(conversion: ConversionConfig, server: ServerConfig) -> Self {
        Self { conversion, server }
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// JSON error body: `{"error": "...", "details": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error with status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: error.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.response.details = Some(details.into());
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn payload_too_large(error: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, error)
    }

    /// `500 {"error":"Conversion failed","details":...}`
    pub fn conversion_failed(details: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Conversion failed").with_details(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<Pdf2DocxError> for ApiError {
    fn from(err: Pdf2DocxError) -> Self {
        match &err {
            Pdf2DocxError::DocumentTooLarge { .. } => Self::payload_too_large(err.to_string()),
            e if e.is_input_error() => Self::bad_request(err.to_string()),
            _ => Self::conversion_failed(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error)
    }
}

impl std::error::Error for ApiError {}

// ── Router ───────────────────────────────────────────────────────────────

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.server.max_request_bytes).unwrap_or(usize::MAX);
    Router::new()
        .route("/health", get(health_check))
        .route("/api/convert", post(convert_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind `server.bind_addr` and serve until the process is stopped.
pub async fn serve(state: AppState) -> Result<(), Pdf2DocxError> {
    let addr = state.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Pdf2DocxError::Internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Server running on {}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Pdf2DocxError::Internal(format!("Server error: {e}")))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/convert
async fn convert_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {}", e)))?;
    let documents = read_documents(&mut multipart, &state).await?;
    if documents.is_empty() {
        return Err(ApiError::bad_request("No files uploaded"));
    }

    let output = convert_to_archive(documents, &state.conversion).await?;

    if let Some(dir) = state.server.persist_dir.clone() {
        spawn_persist(output.archive.clone(), dir);
    }

    let len = output.archive.len();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", state.server.download_name),
            ),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        output.archive,
    )
        .into_response())
}

/// Collect every part of the configured field, enforcing the per-file ceiling.
async fn read_documents(
    multipart: &mut Multipart,
    state: &AppState,
) -> Result<Vec<InputDocument>, ApiError> {
    let limit = state.conversion.max_document_bytes;
    let mut documents = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        ApiError::new(e.status(), format!("Failed to read multipart field: {}", e.body_text()))
    })? {
        if field.name() != Some(state.server.field_name.as_str()) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DOCUMENT_NAME)
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            ApiError::new(
                e.status(),
                format!("Failed to read file '{}': {}", name, e.body_text()),
            )
        })? {
            let size = (bytes.len() + chunk.len()) as u64;
            if size > limit {
                return Err(Pdf2DocxError::DocumentTooLarge { name, size, limit }.into());
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!("Received {} ({} bytes)", name, bytes.len());
        documents.push(InputDocument::new(name, bytes));
    }

    Ok(documents)
}
