//! Offline pipeline handlers: run a whole transcript through a throwaway
//! session in one request, then evaluate an already-produced payload
//! against threshold gates.

use axum::Json;

use crate::api::error::ApiResult;
use crate::api::models::{PipelineEvaluateRequest, PipelineEvaluateResponse, PipelineRunRequest, PipelineRunResponse};
use crate::evaluator;
use crate::session::Session;
use crate::transcript::{parse_chunks, replay_chunks, ReplayConfig};
use crate::waitk::WaitKConfig;

/// Parse the transcript, replay it through a fresh session, and return the
/// resulting pipeline payload -- the offline counterpart to a live
/// session's snapshot, with `meta.mode` set to `"offline_replay"`.
pub async fn run(Json(req): Json<PipelineRunRequest>) -> ApiResult<impl axum::response::IntoResponse> {
    let chunks = parse_chunks(&req.transcript, req.format.into())?;

    let wait_k = req.wait_k.unwrap_or_else(WaitKConfig::default);
    let mut session = Session::new(wait_k);

    let replay_config = ReplayConfig {
        realtime: req.realtime,
        time_scale: req.time_scale,
        max_chunks: req.max_chunks,
    };
    replay_chunks(&chunks, replay_config, |chunk| {
        session.ingest_chunk(chunk.clone());
    })
    .await;
    session.flush();

    let mut payload = session.snapshot();
    payload.meta.mode = "offline_replay".to_string();

    Ok(crate::api::response::ok(PipelineRunResponse { payload }))
}

/// Evaluate a previously produced pipeline payload against threshold
/// gates, falling back to the server's configured defaults.
pub async fn evaluate(Json(req): Json<PipelineEvaluateRequest>) -> impl axum::response::IntoResponse {
    let thresholds = req.thresholds.unwrap_or_default();
    let report = evaluator::evaluate_payload(req.payload(), thresholds);
    crate::api::response::ok(PipelineEvaluateResponse { report })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_handler_produces_an_offline_payload() {
        let req = PipelineRunRequest {
            transcript: r#"[{"timestamp_ms": 0, "text": "first capture sensor data"}, {"timestamp_ms": 450, "text": "then normalize and filter."}]"#.to_string(),
            format: Default::default(),
            wait_k: None,
            realtime: false,
            time_scale: 1.0,
            max_chunks: 0,
        };
        let result = run(Json(req)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn run_handler_rejects_malformed_transcript() {
        let req = PipelineRunRequest {
            transcript: "42".to_string(),
            format: Default::default(),
            wait_k: None,
            realtime: false,
            time_scale: 1.0,
            max_chunks: 0,
        };
        let result = run(Json(req)).await;
        assert!(result.is_err());
    }
}
