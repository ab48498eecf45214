//! Integration test: status fetches, uploads and retries against a local backend stand-in.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use vproc_core::retry::{run_with_retry, RetryPolicy};
use vproc_core::source::{
    HttpConfig, HttpStatusSource, SourceError, StatusSource, NETWORK_ERROR, STATUS_FETCH_FAILED,
};
use vproc_core::status::ProcessingStatus;
use vproc_core::upload::{
    HttpUploadSource, PublicationStatus, UploadSource, VideoMetadata, VideoUpload,
};

fn status_json(status: &str) -> String {
    format!(
        r#"{{"video_id":"job-42","status":"{status}","progress":50,"message":"","error":null,"is_completed":{},"is_failed":{}}}"#,
        status == "completed",
        status == "failed"
    )
}

#[tokio::test]
async fn fetch_status_decodes_payload_and_sends_token() {
    let server = common::api_server::start(|_| (200, status_json("transcoding")));
    let mut http = HttpConfig::new(&server.base_url).unwrap();
    http.access_token = Some("secret-token".into());
    let source = HttpStatusSource::new(http);

    let response = source.fetch_status("job-42").await.expect("fetch");
    assert_eq!(response.status, ProcessingStatus::Transcoding);
    assert_eq!(response.video_id, "job-42");
    assert!(!response.is_completed);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/videos/job-42/status");
    assert_eq!(
        requests[0].header("Authorization"),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn not_found_uses_backend_detail() {
    let server = common::api_server::start(|_| (404, r#"{"detail":"Video not found"}"#.into()));
    let source = HttpStatusSource::new(HttpConfig::new(&server.base_url).unwrap());
    let err = source.fetch_status("missing").await.unwrap_err();
    assert!(matches!(err, SourceError::Http { code: 404, .. }));
    assert_eq!(err.message(), "Video not found");
}

#[tokio::test]
async fn server_error_without_detail_uses_fallback() {
    let server = common::api_server::start(|_| (500, "oops".into()));
    let source = HttpStatusSource::new(HttpConfig::new(&server.base_url).unwrap());
    let err = source.fetch_status("job-42").await.unwrap_err();
    assert_eq!(err.message(), STATUS_FETCH_FAILED);
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = common::api_server::start(|_| (200, "{\"status\":".into()));
    let source = HttpStatusSource::new(HttpConfig::new(&server.base_url).unwrap());
    let err = source.fetch_status("job-42").await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let source = HttpStatusSource::new(HttpConfig::new(&common::api_server::closed_url()).unwrap());
    let err = source.fetch_status("job-42").await.unwrap_err();
    assert!(matches!(err, SourceError::Network(_)), "{err:?}");
    assert_eq!(err.message(), NETWORK_ERROR);
}

#[tokio::test]
async fn retry_recovers_from_unavailable_backend() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    let server = common::api_server::start(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            (503, r#"{"detail":"busy"}"#.into())
        } else {
            (200, status_json("queued"))
        }
    });
    let source = HttpStatusSource::new(HttpConfig::new(&server.base_url).unwrap());
    let policy = RetryPolicy {
        max_attempts: 4,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    };
    let response = run_with_retry(&policy, || source.fetch_status("job-42"))
        .await
        .expect("retried fetch");
    assert_eq!(response.status, ProcessingStatus::Queued);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_does_not_repeat_client_errors() {
    let server = common::api_server::start(|_| (404, r#"{"detail":"Video not found"}"#.into()));
    let source = HttpStatusSource::new(HttpConfig::new(&server.base_url).unwrap());
    let err = run_with_retry(&RetryPolicy::default(), || source.fetch_status("job-42"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Video not found");
    assert_eq!(server.requests().len(), 1);
}

fn sample_upload(dir: &std::path::Path) -> VideoUpload {
    let video_path = dir.join("clip.mp4");
    let thumbnail_path = dir.join("thumb.jpg");
    std::fs::write(&video_path, b"fake mp4 bytes").unwrap();
    std::fs::write(&thumbnail_path, b"fake jpg bytes").unwrap();
    VideoUpload {
        metadata: VideoMetadata {
            title: "Demo".into(),
            description: "A short demo".into(),
            category: "documentary".into(),
            status: PublicationStatus::Published,
            tags: vec!["demo".into(), "hd".into()],
            ..VideoMetadata::default()
        },
        video_path,
        thumbnail_path,
    }
}

#[tokio::test]
async fn upload_sends_multipart_form_and_returns_job_id() {
    let server = common::api_server::start(|_| {
        (
            201,
            r#"{"id":"job-99","title":"Demo","videoUrl":null,"thumbnailUrl":"/t/job-99.jpg","message":"Video uploaded successfully"}"#.into(),
        )
    });
    let dir = tempdir().unwrap();
    let source = HttpUploadSource::new(HttpConfig::new(&server.base_url).unwrap());

    let response = source.upload(&sample_upload(dir.path())).await.expect("upload");
    assert_eq!(response.id, "job-99");
    assert_eq!(response.thumbnail_url.as_deref(), Some("/t/job-99.jpg"));
    assert!(response.video_url.is_none());

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/videos/create");
    assert!(request
        .header("Content-Type")
        .is_some_and(|ct| ct.starts_with("multipart/form-data")));
    let body = request.body_text();
    assert!(body.contains(r#"name="video""#));
    assert!(body.contains(r#"name="thumbnail""#));
    assert!(body.contains(r#"name="data""#));
    assert!(body.contains("fake mp4 bytes"));
    assert!(body.contains(r#""title":"Demo""#));
    assert!(body.contains(r#""status":"published""#));
}

#[tokio::test]
async fn upload_error_prefers_message_field() {
    let server = common::api_server::start(|_| {
        (
            400,
            r#"{"message":"Unsupported video format","detail":"ignored"}"#.into(),
        )
    });
    let dir = tempdir().unwrap();
    let source = HttpUploadSource::new(HttpConfig::new(&server.base_url).unwrap());
    let err = source.upload(&sample_upload(dir.path())).await.unwrap_err();
    assert!(matches!(err, SourceError::Http { code: 400, .. }));
    assert_eq!(err.message(), "Unsupported video format");
}
