mod common;

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use common::{FakeSource, release};
use tempfile::TempDir;
use tower::ServiceExt;
use vinylcli::{
    management::Collection,
    server::{AppState, router},
};

const BARCODE: &str = "5099902894225";

fn state(dir: &TempDir, source: FakeSource) -> Arc<AppState> {
    Arc::new(AppState::new(
        Collection::open(dir.path().join("records.json")),
        Arc::new(source),
    ))
}

fn thriller_source() -> FakeSource {
    FakeSource::new().with_release(
        BARCODE,
        release(7, "Michael Jackson - Thriller", &["Pop"]),
        20.0,
    )
}

async fn send(state: Arc<AppState>, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_post_barcode_saves_match() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir, thriller_source());

    let (status, body) = send(Arc::clone(&state), "POST", "/", &format!("{}\n", BARCODE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success: saved Michael Jackson - Thriller");

    let records = state.collection.records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, BARCODE);
}

#[tokio::test]
async fn test_post_known_barcode_is_not_saved_twice() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir, thriller_source());

    send(Arc::clone(&state), "POST", "/", BARCODE).await;
    let (status, body) = send(Arc::clone(&state), "POST", "/", BARCODE).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("already in the collection"));
    assert_eq!(state.collection.records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_unknown_barcode() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir, FakeSource::new());

    let (status, body) = send(Arc::clone(&state), "POST", "/", "0000000000000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success: no record found with barcode 0000000000000");
    assert!(state.collection.records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_empty_body_is_bad_request() {
    let dir = TempDir::new().unwrap();

    let (status, body) = send(state(&dir, FakeSource::new()), "POST", "/", "  ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Error: Empty barcode");
}

#[tokio::test]
async fn test_failing_lookup_is_bad_gateway() {
    let dir = TempDir::new().unwrap();
    let source = FakeSource::new().failing_search(BARCODE);

    let (status, body) = send(state(&dir, source), "POST", "/", BARCODE).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.starts_with("Error: "));
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let dir = TempDir::new().unwrap();

    let (status, body) = send(state(&dir, FakeSource::new()), "GET", "/", "").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, "Error: Invalid request method");
}

#[tokio::test]
async fn test_health_reports_record_count() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir, thriller_source());
    send(Arc::clone(&state), "POST", "/", BARCODE).await;

    let (status, body) = send(state, "GET", "/health", "").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["records"], 1);
    assert!(json["started_at"].is_string());
}

#[tokio::test]
async fn test_unreadable_collection_is_server_error() {
    let dir = TempDir::new().unwrap();
    // a directory where the collection file should be
    let state = Arc::new(AppState::new(
        Collection::open(dir.path()),
        Arc::new(thriller_source()),
    ));

    let (status, body) = send(state, "POST", "/", BARCODE).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error: "));
}
