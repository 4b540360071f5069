//! HTTP route tests driven through `tower::ServiceExt::oneshot`.

#![cfg(feature = "server")]

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use common::{create_test_pdf, read_archive, PlainSerializer, ScriptedExtractor};
use edgequake_pdf2docx::server::{router, AppState};
use edgequake_pdf2docx::{ConversionConfig, ServerConfig};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "X-PDF2DOCX-TEST-BOUNDARY";

/// `(field, file name, bytes)` parts → multipart/form-data body.
fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn state(conversion: ConversionConfig) -> AppState {
    common::init_tracing();
    AppState::new(
        conversion,
        ServerConfig {
            persist_dir: None,
            ..ServerConfig::default()
        },
    )
}

fn scripted() -> ConversionConfig {
    ConversionConfig::builder()
        .extractor(Arc::new(ScriptedExtractor))
        .serializer(Arc::new(PlainSerializer))
        .build()
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = router(state(scripted()))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn upload_without_files_is_400() {
    let response = router(state(scripted()))
        .oneshot(upload(multipart_body(&[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "No files uploaded" })
    );
}

#[tokio::test]
async fn parts_under_other_fields_are_ignored() {
    let body = multipart_body(&[("avatar", "me.pdf", &b"hello"[..])]);
    let response = router(state(scripted())).oneshot(upload(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_multipart_request_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = router(state(scripted())).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mixed_upload_returns_zip_with_headers() {
    let body = multipart_body(&[
        ("files", "good.pdf", &b"line one\nline two"[..]),
        ("files", "bad.pdf", &b"corrupt"[..]),
    ]);
    let response = router(state(scripted())).oneshot(upload(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=converted_files.zip"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        headers[header::CONTENT_LENGTH].to_str().unwrap(),
        bytes.len().to_string()
    );

    let entries = read_archive(&bytes);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["good.txt"], b"2\nline one\nline two\n");
    assert!(String::from_utf8_lossy(&entries["bad.pdf.error.txt"])
        .starts_with("Conversion failed"));
}

#[tokio::test]
async fn oversized_part_is_413() {
    let config = ConversionConfig::builder()
        .extractor(Arc::new(ScriptedExtractor))
        .max_document_bytes(16)
        .build()
        .unwrap();
    let big = vec![b'a'; 64];
    let body = multipart_body(&[
        ("files", "small.pdf", &b"ok"[..]),
        ("files", "huge.pdf", big.as_slice()),
    ]);

    let response = router(state(config)).oneshot(upload(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("huge.pdf"), "got: {json}");
}

#[tokio::test]
async fn archive_finalization_failure_is_500_without_zip() {
    let config = ConversionConfig::builder()
        .extractor(Arc::new(ScriptedExtractor))
        .serializer(Arc::new(PlainSerializer))
        .max_archive_bytes(64)
        .build()
        .unwrap();
    let body = multipart_body(&[
        ("files", "good.pdf", &b"line one\nline two"[..]),
        ("files", "bad.pdf", &b"corrupt"[..]),
    ]);

    let response = router(state(config)).oneshot(upload(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());

    let json = json_body(response).await;
    assert_eq!(json["error"], "Conversion failed");
    let details = json["details"].as_str().unwrap();
    assert!(details.contains("64-byte ceiling"), "got: {details}");
}

#[tokio::test]
async fn real_pdf_upload_produces_docx() {
    let pdf = create_test_pdf("Hello World");
    let body = multipart_body(&[("files", "hello.pdf", pdf.as_slice())]);
    let response = router(state(ConversionConfig::default()))
        .oneshot(upload(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let entries = read_archive(&bytes);
    assert!(entries.contains_key("hello.docx"), "got: {:?}", entries.keys());

    let xml = common::document_xml(&entries["hello.docx"]);
    assert!(xml.contains("Hello") || xml.contains("World"));
}

#[tokio::test]
async fn archive_copy_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(AppState::new(
        scripted(),
        ServerConfig {
            persist_dir: Some(dir.path().to_path_buf()),
            ..ServerConfig::default()
        },
    ));

    let body = multipart_body(&[("files", "a.pdf", &b"text"[..])]);
    let response = app.oneshot(upload(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The copy is written by a detached task.
    let mut found = Vec::new();
    for _ in 0..50 {
        found = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("converted_files_") && n.ends_with(".zip"))
            .collect();
        if !found.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(found.len(), 1, "no archive copy in {}", dir.path().display());
    assert!(!found[0].contains(':'));
}
