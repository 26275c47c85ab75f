//! Session orchestrator (component G): owns one pipeline+renderer per
//! session, serializes access to it, and answers ingest/flush/snapshot.

mod payload;
mod registry;

pub use payload::{EngineReport, Meta, PipelinePayload, SessionEvent, Summary};
pub use registry::{SessionInfo, SessionRegistry};

use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pipeline::Pipeline;
use crate::renderer::IncrementalRenderer;
use crate::waitk::WaitKConfig;

/// Opaque 12-hex-character session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let bytes: [u8; 6] = rand::thread_rng().gen();
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single session: its pipeline, its persistent render graph, and the
/// event/label history needed to answer snapshot/flush/evaluate.
pub struct Session {
    id: SessionId,
    pipeline: Pipeline,
    renderer: IncrementalRenderer,
    events: Vec<SessionEvent>,
    label_log: Vec<(i64, Option<String>)>,
    created_at: Instant,
    first_chunk_ts: Option<i64>,
    last_chunk_ts: Option<i64>,
}

impl Session {
    pub fn new(wait_k_config: WaitKConfig) -> Self {
        Self {
            id: SessionId::generate(),
            pipeline: Pipeline::with_wait_k_config(wait_k_config),
            renderer: IncrementalRenderer::new(),
            events: Vec::new(),
            label_log: Vec::new(),
            created_at: Instant::now(),
            first_chunk_ts: None,
            last_chunk_ts: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn chunk_count(&self) -> usize {
        self.label_log.len()
    }

    pub fn updates_emitted(&self) -> usize {
        self.events.len()
    }

    pub fn current_wait_k(&self) -> usize {
        self.pipeline.current_wait_k()
    }

    /// Forward a chunk into the pipeline, rendering and recording any
    /// update it produces. Returns a copy of the new event, if one was
    /// dispatched.
    pub fn ingest_chunk(&mut self, chunk: crate::transcript::TranscriptChunk) -> Option<SessionEvent> {
        self.first_chunk_ts.get_or_insert(chunk.timestamp_ms);
        self.last_chunk_ts = Some(chunk.timestamp_ms);
        self.label_log.push((chunk.timestamp_ms, chunk.expected_intent.clone()));

        let update = self.pipeline.ingest(chunk)?;
        Some(self.render_and_record(update))
    }

    /// Dispatch any tail segment as `stream_end` and record it.
    pub fn flush(&mut self) -> Option<SessionEvent> {
        let update = self.pipeline.flush()?;
        Some(self.render_and_record(update))
    }

    fn render_and_record(&mut self, update: crate::pipeline::StreamingUpdate) -> SessionEvent {
        let render_t0 = Instant::now();
        let frame = self
            .renderer
            .apply_update(update.update_id, &update.operations, update.intent_type.as_str());
        let render_latency_ms = render_t0.elapsed().as_millis() as i64;
        let e2e_latency_ms = update.processing_latency_ms as f64 + render_latency_ms as f64;

        let gold_intent = majority_label(&self.label_log, update.start_ms, update.end_ms);
        let intent_correct = gold_intent.as_deref().map(|g| g == update.intent_type.as_str());

        let event = SessionEvent {
            update,
            render_frame: frame,
            gold_intent,
            intent_correct,
            render_latency_ms,
            e2e_latency_ms,
        };
        self.events.push(event.clone());
        event
    }

    /// Build the read-only pipeline payload without mutating the session.
    pub fn snapshot(&self) -> PipelinePayload {
        payload::build(self)
    }

    pub(crate) fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub(crate) fn renderer(&self) -> &IncrementalRenderer {
        &self.renderer
    }

    pub(crate) fn runtime_ms(&self) -> i64 {
        self.created_at.elapsed().as_millis() as i64
    }

    pub(crate) fn transcript_duration_ms(&self) -> i64 {
        match (self.first_chunk_ts, self.last_chunk_ts) {
            (Some(a), Some(b)) => (b - a).max(0),
            _ => 0,
        }
    }
}

/// Mode of `expected_intent` among chunks whose timestamp falls in
/// `[start_ms, end_ms]`; ties broken by first-encountered label. `None` if
/// no labeled chunk falls in range.
fn majority_label(label_log: &[(i64, Option<String>)], start_ms: i64, end_ms: i64) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for (ts, label) in label_log {
        let Some(label) = label else { continue };
        if *ts < start_ms || *ts > end_ms {
            continue;
        }
        match counts.iter_mut().find(|(l, _)| l == label) {
            Some((_, c)) => *c += 1,
            None => counts.push((label.clone(), 1)),
        }
    }
    if counts.is_empty() {
        return None;
    }
    let mut best = counts[0].clone();
    for (label, count) in counts.into_iter().skip(1) {
        if count > best.1 {
            best = (label, count);
        }
    }
    Some(best.0)
}
