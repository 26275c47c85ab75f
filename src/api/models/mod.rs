//! Request/response DTOs for the HTTP surface: health, session lifecycle,
//! and offline pipeline run/evaluate.

use serde::{Deserialize, Serialize};

use crate::evaluator::{EvalReport, EvalThresholds};
use crate::session::{PipelinePayload, SessionEvent, SessionId, SessionInfo};
use crate::transcript::TranscriptFormat;
use crate::waitk::WaitKConfig;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: crate::VERSION,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionInfo>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub wait_k: Option<WaitKConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkRequest {
    pub session_id: SessionId,
    pub timestamp_ms: i64,
    pub text: String,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub is_final: Option<bool>,
    #[serde(default)]
    pub expected_intent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkResponse {
    pub event: Option<SessionEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionIdRequest {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub event: Option<SessionEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseResponse {
    pub removed: bool,
}

/// Which shape `transcript` in a `PipelineRunRequest` is in. Defaults to
/// `json`, the richest format, since it round-trips every chunk field.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptFormatDto {
    #[default]
    Json,
    Jsonl,
    FreeForm,
}

impl From<TranscriptFormatDto> for TranscriptFormat {
    fn from(dto: TranscriptFormatDto) -> Self {
        match dto {
            TranscriptFormatDto::Json => TranscriptFormat::Json,
            TranscriptFormatDto::Jsonl => TranscriptFormat::Jsonl,
            TranscriptFormatDto::FreeForm => TranscriptFormat::FreeForm,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineRunRequest {
    pub transcript: String,
    #[serde(default)]
    pub format: TranscriptFormatDto,
    #[serde(default)]
    pub wait_k: Option<WaitKConfig>,
    #[serde(default)]
    pub realtime: bool,
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    #[serde(default)]
    pub max_chunks: usize,
}

fn default_time_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineRunResponse {
    #[serde(flatten)]
    pub payload: PipelinePayload,
}

/// Accepts the pipeline payload under either `pipeline` or
/// `pipeline_result`; `pipeline` wins if both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineEvaluateRequest {
    #[serde(flatten)]
    payload: PipelinePayloadRef,
    #[serde(default)]
    pub thresholds: Option<EvalThresholds>,
}

impl PipelineEvaluateRequest {
    pub fn payload(&self) -> &PipelinePayload {
        &self.payload.0
    }
}

#[derive(Debug, Clone)]
struct PipelinePayloadRef(PipelinePayload);

impl<'de> Deserialize<'de> for PipelinePayloadRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Envelope {
            pipeline: Option<PipelinePayload>,
            pipeline_result: Option<PipelinePayload>,
        }
        let envelope = Envelope::deserialize(deserializer)?;
        let payload = envelope
            .pipeline
            .or(envelope.pipeline_result)
            .ok_or_else(|| serde::de::Error::custom("expected a `pipeline` or `pipeline_result` field"))?;
        Ok(PipelinePayloadRef(payload))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineEvaluateResponse {
    #[serde(flatten)]
    pub report: EvalReport,
}
