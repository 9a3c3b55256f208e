//! End-to-end tests driving the router with in-memory requests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alfred_talk_webhook::config::Config;
use alfred_talk_webhook::error::ErrorResponse;
use alfred_talk_webhook::services::{FixedClock, TranscriptStore};
use alfred_talk_webhook::utils::compute_signature;
use alfred_talk_webhook::{build_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "wsec_integration";

fn test_app(root: &Path, secret: Option<&str>) -> Router {
    match secret {
        Some(secret) => test_app_with(root, &[("ELEVENLABS_WEBHOOK_SECRET", secret)]),
        None => test_app_with(root, &[]),
    }
}

fn test_app_with(root: &Path, extra: &[(&str, &str)]) -> Router {
    let mut vars = HashMap::from([(
        "TRANSCRIPT_DIR".to_string(),
        root.to_string_lossy().into_owned(),
    )]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }
    let config = Config::from_vars(|key| vars.get(key).cloned()).unwrap();

    let instant = Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 30).unwrap();
    let store = TranscriptStore::with_clock(root, Arc::new(FixedClock(instant)));

    build_router(AppState::new(config, store))
}

fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/elevenlabs-webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("elevenlabs-signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn sign(body: &str) -> String {
    let timestamp = "1709287530";
    format!("t={},v1={}", timestamp, compute_signature(timestamp, body, SECRET))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                found.push(path);
            }
        }
    }
    found
}

fn transcript_body(conversation_id: &str) -> String {
    json!({
        "type": "post_call_transcription",
        "event_timestamp": 1709287530,
        "data": {
            "agent_id": "agent_1",
            "conversation_id": conversation_id,
            "transcript": [
                {"role": "agent", "message": "Bonsoir, monsieur."},
                {"role": "user", "message": "Hello Alfred"}
            ]
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));

    let (status, body) = send(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "alfred-talk-webhook"}));
    assert!(files_under(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_unsigned_webhook_persisted_when_no_secret() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), None);
    let body = transcript_body("abc123");

    let (status, response) = send(app, webhook_request(&body, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"status": "ok"}));

    let path = temp_dir.path().join("2024-03-01/10-05-30_abc123.json");
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved, serde_json::from_str::<Value>(&body).unwrap());
}

#[tokio::test]
async fn test_signed_webhook_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));
    let body = transcript_body("abc123");

    let (status, _) = send(app, webhook_request(&body, Some(&sign(&body)))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(temp_dir
        .path()
        .join("2024-03-01/10-05-30_abc123.json")
        .is_file());
}

#[tokio::test]
async fn test_invalid_signature_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));
    let body = transcript_body("abc123");
    let signature = sign(&transcript_body("other"));

    let response = app
        .oneshot(webhook_request(&body, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let request_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.error.code_number, 1001);
    assert_eq!(error.request_id, request_id);
    assert!(files_under(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_missing_signature_rejected_when_secret_configured() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));

    let (status, body) = send(app, webhook_request(&transcript_body("abc123"), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_1002");
    assert!(files_under(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_malformed_signature_header_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));

    let (status, _) = send(
        app,
        webhook_request(&transcript_body("abc123"), Some("t=1709287530")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reserialized_body_fails_verification() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));
    let body = transcript_body("abc123");
    let signature = sign(&body);
    let reformatted =
        serde_json::to_string_pretty(&serde_json::from_str::<Value>(&body).unwrap()).unwrap();

    let (status, _) = send(app, webhook_request(&reformatted, Some(&signature))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_event_acknowledged_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), None);
    let body = json!({"type": "other_event", "data": {"conversation_id": "abc123"}}).to_string();

    let (status, response) = send(app, webhook_request(&body, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"status": "ok"}));
    assert!(files_under(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_malformed_json_acknowledged() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));
    let body = "{\"type\": \"post_call_transcription\"";

    let (status, response) = send(app, webhook_request(body, Some(&sign(body)))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"status": "ok"}));
    assert!(files_under(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_missing_conversation_id_saved_as_unknown() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), None);
    let body = json!({"type": "post_call_transcription", "data": {}}).to_string();

    let (status, _) = send(app, webhook_request(&body, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(temp_dir
        .path()
        .join("2024-03-01/10-05-30_unknown.json")
        .is_file());
}

#[tokio::test]
async fn test_same_second_duplicate_overwrites() {
    // Intended behavior: same second + same conversation id share a path and
    // the later request's content wins.
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), None);
    let first = json!({"type": "post_call_transcription", "data": {"conversation_id": "dup", "attempt": 1}}).to_string();
    let second = json!({"type": "post_call_transcription", "data": {"conversation_id": "dup", "attempt": 2}}).to_string();

    let (status, _) = send(app.clone(), webhook_request(&first, None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app, webhook_request(&second, None)).await;
    assert_eq!(status, StatusCode::OK);

    let files = files_under(temp_dir.path());
    assert_eq!(files.len(), 1);
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(saved["data"]["attempt"], 2);
}

#[tokio::test]
async fn test_filesystem_failure_still_acknowledged() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocked");
    std::fs::write(&blocker, b"").unwrap();
    let app = test_app(&blocker, None);

    let (status, response) = send(app, webhook_request(&transcript_body("abc123"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_health_unaffected_by_broken_store() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocked");
    std::fs::write(&blocker, b"").unwrap();
    let app = test_app(&blocker, Some(SECRET));

    let (status, _) = send(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_large_ignored_event_acknowledged() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), None);
    let audio = "A".repeat(11 * 1024 * 1024);
    let body = json!({
        "type": "post_call_audio",
        "data": {"conversation_id": "big", "full_audio": audio}
    })
    .to_string();

    let (status, response) = send(app, webhook_request(&body, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"status": "ok"}));
    assert!(files_under(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_large_transcript_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), Some(SECRET));
    let message = "x".repeat(3 * 1024 * 1024);
    let body = json!({
        "type": "post_call_transcription",
        "data": {
            "conversation_id": "long",
            "transcript": [{"role": "user", "message": message}]
        }
    })
    .to_string();

    let (status, _) = send(app, webhook_request(&body, Some(&sign(&body)))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(temp_dir
        .path()
        .join("2024-03-01/10-05-30_long.json")
        .is_file());
}

#[tokio::test]
async fn test_configured_body_limit_applies() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app_with(temp_dir.path(), &[("MAX_BODY_SIZE", "64")]);

    let response = app
        .oneshot(webhook_request(&transcript_body("abc123"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(files_under(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_null_type_is_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(temp_dir.path(), None);
    let body = json!({
        "type": null,
        "event_type": "post_call_transcription",
        "data": {"conversation_id": "n"}
    })
    .to_string();

    let (status, response) = send(app, webhook_request(&body, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"status": "ok"}));
    assert!(files_under(temp_dir.path()).is_empty());
}
