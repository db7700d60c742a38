//! Integration tests for the answer endpoints.
//!
//! Requests are driven straight through the router, no socket involved.

use answer_engine::{AnswerSet, DownloadResponse};
use answer_server::config::Config;
use answer_server::{app, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn open_app() -> Router {
    app(AppState::new(Config::open("127.0.0.1", 0)))
}

fn request(path: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn decode_download(body: Value) -> AnswerSet {
    serde_json::from_value::<DownloadResponse>(body)
        .unwrap()
        .into_answer_set()
        .unwrap()
}

#[tokio::test]
async fn empty_account_downloads_empty_marker() {
    let app = open_app();

    let (status, body) = send(&app, request("/answers/download", Some("alice"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"answers": "[]"}));
}

#[tokio::test]
async fn upload_then_download() {
    let app = open_app();

    let upload = json!({"answers": {"q1": "Faith", "q2": "Hope"}});
    let (status, body) = send(&app, request("/answers/upload", Some("alice"), Some(upload))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["answerCount"], 2);

    let (status, body) = send(&app, request("/answers/download", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["answers"].is_string());

    let answers = decode_download(body);
    assert_eq!(answers.get("q1"), Some("Faith"));
    assert_eq!(answers.get("q2"), Some("Hope"));
}

#[tokio::test]
async fn upload_replaces_whole_set() {
    let app = open_app();

    let first = json!({"answers": {"q1": "Faith", "q2": "Hope"}});
    send(&app, request("/answers/upload", Some("alice"), Some(first))).await;

    let second = json!({"answers": {"q3": "Love"}});
    send(&app, request("/answers/upload", Some("alice"), Some(second))).await;

    let (_, body) = send(&app, request("/answers/download", Some("alice"), None)).await;
    let answers = decode_download(body);
    assert_eq!(answers.len(), 1);
    assert!(!answers.contains("q1"));
}

#[tokio::test]
async fn count_reports_stored_answers() {
    let app = open_app();

    let (status, body) = send(&app, request("/answers/count", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"answerCount": 0}));

    let upload = json!({"answers": {"q1": "Faith", "q2": "Hope", "q3": ""}});
    send(&app, request("/answers/upload", Some("alice"), Some(upload))).await;

    let (_, body) = send(&app, request("/answers/count", Some("alice"), None)).await;
    assert_eq!(body["answerCount"], 3);
}

#[tokio::test]
async fn accounts_do_not_share_answers() {
    let app = open_app();

    let upload = json!({"answers": {"q1": "Faith"}});
    send(&app, request("/answers/upload", Some("alice"), Some(upload))).await;

    let (_, body) = send(&app, request("/answers/count", Some("bob"), None)).await;
    assert_eq!(body["answerCount"], 0);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = open_app();

    for path in ["/answers/download", "/answers/upload", "/answers/count"] {
        let body = (path == "/answers/upload").then(|| json!({"answers": {}}));
        let (status, _) = send(&app, request(path, None, body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn allow_list_rejects_unknown_tokens() {
    let config = Config {
        access_tokens: Some(vec!["alice".to_string()]),
        ..Config::open("127.0.0.1", 0)
    };
    let app = app(AppState::new(config));

    let (status, body) = send(&app, request("/answers/count", Some("mallory"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, request("/answers/count", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn empty_question_id_is_rejected() {
    let app = open_app();

    let upload = json!({"answers": {"": "orphan", "q1": "Faith"}});
    let (status, _) = send(&app, request("/answers/upload", Some("alice"), Some(upload))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored.
    let (_, body) = send(&app, request("/answers/count", Some("alice"), None)).await;
    assert_eq!(body["answerCount"], 0);
}

#[tokio::test]
async fn health_check() {
    let app = open_app();

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["authRequired"], false);
}
