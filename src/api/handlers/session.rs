//! Session lifecycle handlers: create, list, chunk, flush, snapshot, close.

use axum::extract::State;
use axum::Json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{
    ChunkRequest, ChunkResponse, CloseResponse, CreateSessionRequest, CreateSessionResponse, FlushResponse,
    SessionIdRequest, SessionListResponse,
};
use crate::api::response;
use crate::api::routes::AppState;
use crate::transcript::TranscriptChunk;

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> impl axum::response::IntoResponse {
    let wait_k = req.wait_k.unwrap_or(state.config.wait_k);
    let session_id = state.registry.create(wait_k);
    response::created(CreateSessionResponse { session_id })
}

pub async fn list(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let sessions = state.registry.list();
    response::ok(SessionListResponse {
        count: sessions.len(),
        sessions,
    })
}

pub async fn chunk(State(state): State<AppState>, Json(req): Json<ChunkRequest>) -> ApiResult<impl axum::response::IntoResponse> {
    let handle = state
        .registry
        .get(&req.session_id)
        .ok_or_else(|| ApiError::NotFound(format!("no session {}", req.session_id)))?;

    let mut chunk = TranscriptChunk::new(req.timestamp_ms, req.text);
    if let Some(speaker) = req.speaker {
        chunk.speaker = speaker;
    }
    if let Some(is_final) = req.is_final {
        chunk.is_final = is_final;
    }
    chunk.expected_intent = req.expected_intent;

    let event = handle.lock().ingest_chunk(chunk);
    Ok(response::ok(ChunkResponse { event }))
}

pub async fn flush(
    State(state): State<AppState>,
    Json(req): Json<SessionIdRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let handle = state
        .registry
        .get(&req.session_id)
        .ok_or_else(|| ApiError::NotFound(format!("no session {}", req.session_id)))?;
    let event = handle.lock().flush();
    Ok(response::ok(FlushResponse { event }))
}

pub async fn snapshot(
    State(state): State<AppState>,
    Json(req): Json<SessionIdRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let handle = state
        .registry
        .get(&req.session_id)
        .ok_or_else(|| ApiError::NotFound(format!("no session {}", req.session_id)))?;
    let payload = handle.lock().snapshot();
    Ok(response::ok(payload))
}

pub async fn close(
    State(state): State<AppState>,
    Json(req): Json<SessionIdRequest>,
) -> impl axum::response::IntoResponse {
    let removed = state.registry.remove(&req.session_id);
    response::ok(CloseResponse { removed })
}
