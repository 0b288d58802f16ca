//! HTTP-level tests for the translation API.
//!
//! The router runs against in-memory collaborators through
//! `tower::ServiceExt::oneshot`; no socket or model download is involved.

#[path = "helpers/fakes.rs"]
mod fakes;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use signbridge::api::{build_router, AppState};
use signbridge::Settings;
use tower::ServiceExt;

use fakes::{scenario_parts, scenario_service, service, FakeMatcher};

fn app() -> Router {
    build_router(AppState::new(scenario_service(), Settings::default()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn translate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/translate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_root_info() {
    let (status, body) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sign Language Translation API");
    assert_eq!(body["health"], "/api/v1/health");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["available_words"], 2);
}

#[tokio::test]
async fn test_translate_scenario() {
    let request = translate_request(json!({ "text": "Hello John, welcome to New York" }));
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["original_text"], "Hello John, welcome to New York");
    assert_eq!(
        body["stats"],
        json!({ "video_count": 2, "fingerspell_count": 3, "skipped_count": 1, "total": 6 })
    );

    let translations = body["translations"].as_array().unwrap();
    let kinds: Vec<&str> = translations
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["video", "fingerspell", "video", "skipped", "fingerspell", "fingerspell"]
    );

    assert_eq!(
        translations[0],
        json!({
            "original_word": "Hello",
            "matched_word": "hello",
            "type": "video",
            "url": "/signs/hello.mp4",
            "letters": null,
            "similarity": 1.0
        })
    );
    assert_eq!(translations[1]["letters"], json!(["j", "o", "h", "n"]));
    assert!(translations[1]["url"].is_null());
}

#[tokio::test]
async fn test_translate_rejects_empty_text() {
    let (status, body) = send(app(), translate_request(json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["detail"].as_str().unwrap().contains("at least 1"));
}

#[tokio::test]
async fn test_translate_rejects_long_text() {
    let text = "a".repeat(1001);
    let (status, body) = send(app(), translate_request(json!({ "text": text }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let text = "a".repeat(1000);
    let (status, _) = send(app(), translate_request(json!({ "text": text }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_translate_rejects_missing_field() {
    let (status, body) = send(app(), translate_request(json!({ "words": "hi" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_translate_failure_is_500() {
    let matcher = Arc::new(FakeMatcher::failing());
    let (_, detector, store) = scenario_parts();
    let app = build_router(AppState::new(
        service(&matcher, &detector, &store),
        Settings::default(),
    ));

    let (status, body) = send(app, translate_request(json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Translation failed: "), "{detail}");
    assert!(detail.contains("model offline"), "{detail}");
}

#[tokio::test]
async fn test_serves_sign_videos() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("hello.mp4"), b"fake video").unwrap();

    let settings = Settings {
        videos_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    let app = build_router(AppState::new(scenario_service(), settings));

    let response = app.clone().oneshot(get("/signs/hello.mp4")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake video");

    let response = app.oneshot(get("/signs/missing.mp4")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
