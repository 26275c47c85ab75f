//! HTTP-surface tests: session lifecycle and offline pipeline endpoints
//! through the real `axum::Router`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use stream2graph::api::routes::{create_router, AppState};
use stream2graph::config::ServerConfig;
use stream2graph::session::SessionRegistry;

fn app() -> axum::Router {
    create_router(AppState {
        registry: SessionRegistry::new(),
        config: ServerConfig::default(),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ok_status() {
    let response = app()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn every_response_carries_no_store() {
    let response = app()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");
}

#[tokio::test]
async fn session_lifecycle_create_chunk_flush_snapshot_close() {
    let app = app();

    let create_response = app.clone().oneshot(post("/api/session/create", json!({}))).await.unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);
    let created = body_json(create_response).await;
    let session_id = created["data"]["session_id"].as_str().unwrap().to_string();

    let chunk_response = app
        .clone()
        .oneshot(post(
            "/api/session/chunk",
            json!({
                "session_id": session_id,
                "timestamp_ms": 0,
                "text": "gateway module connects to auth service and data service.",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(chunk_response.status(), StatusCode::OK);

    let flush_response = app
        .clone()
        .oneshot(post("/api/session/flush", json!({"session_id": session_id})))
        .await
        .unwrap();
    assert_eq!(flush_response.status(), StatusCode::OK);
    let flushed = body_json(flush_response).await;
    assert!(flushed["data"]["event"].is_object());

    let snapshot_response = app
        .clone()
        .oneshot(post("/api/session/snapshot", json!({"session_id": session_id})))
        .await
        .unwrap();
    assert_eq!(snapshot_response.status(), StatusCode::OK);
    let snapshot = body_json(snapshot_response).await;
    assert_eq!(snapshot["data"]["meta"]["mode"], "live_session");

    let close_response = app
        .clone()
        .oneshot(post("/api/session/close", json!({"session_id": session_id})))
        .await
        .unwrap();
    let closed = body_json(close_response).await;
    assert_eq!(closed["data"]["removed"], true);
}

#[tokio::test]
async fn chunk_against_unknown_session_returns_404() {
    let response = app()
        .oneshot(post(
            "/api/session/chunk",
            json!({"session_id": "deadbeefcafe", "timestamp_ms": 0, "text": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn pipeline_run_then_evaluate_round_trips() {
    let app = app();
    let transcript = json!([
        {"timestamp_ms": 0, "text": "first capture sensor data"},
        {"timestamp_ms": 450, "text": "then normalize and filter."}
    ])
    .to_string();

    let run_response = app
        .clone()
        .oneshot(post(
            "/api/pipeline/run",
            json!({"transcript": transcript, "format": "json"}),
        ))
        .await
        .unwrap();
    assert_eq!(run_response.status(), StatusCode::OK);
    let run_body = body_json(run_response).await;
    assert_eq!(run_body["data"]["meta"]["mode"], "offline_replay");

    let pipeline_payload = run_body["data"].clone();
    let evaluate_response = app
        .oneshot(post("/api/pipeline/evaluate", json!({"pipeline": pipeline_payload})))
        .await
        .unwrap();
    assert_eq!(evaluate_response.status(), StatusCode::OK);
    let evaluated = body_json(evaluate_response).await;
    assert!(evaluated["data"]["realtime_eval_pass"].is_boolean());
}

#[tokio::test]
async fn pipeline_run_rejects_malformed_transcript() {
    let response = app()
        .oneshot(post("/api/pipeline/run", json!({"transcript": "42", "format": "json"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
