//! The `{meta, summary, engine_report, renderer_state, events}` payload
//! shared by snapshot, flush, and the offline pipeline endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::pipeline::StreamingUpdate;
use crate::renderer::{RendererStability, RendererState, RenderFrame};
use crate::stats::StatPack;

use super::Session;

/// One recorded update + its render frame + evaluation bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub update: StreamingUpdate,
    pub render_frame: RenderFrame,
    pub gold_intent: Option<String>,
    pub intent_correct: Option<bool>,
    pub render_latency_ms: i64,
    pub e2e_latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub mode: String,
    pub input_chunk_count: usize,
    pub runtime_ms: i64,
    pub transcript_duration_ms: i64,
    pub speedup_vs_realtime: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub updates_emitted: usize,
    pub latency_e2e_ms: StatPack,
    pub latency_update_ms: StatPack,
    pub latency_render_ms: StatPack,
    pub intent_labeled_eval_count: usize,
    pub intent_labeled_accuracy: Option<f64>,
    pub intent_runtime_distribution: HashMap<String, usize>,
    pub boundary_distribution: HashMap<String, usize>,
    pub renderer_stability: RendererStability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineReport {
    pub updates_emitted: usize,
    pub current_wait_k: usize,
    pub intent_distribution: HashMap<String, usize>,
    pub boundary_distribution: HashMap<String, usize>,
    pub latency_ms: StatPack,
    pub update_duration_ms: StatPack,
    pub tokens_per_update: StatPack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelinePayload {
    pub meta: Meta,
    pub summary: Summary,
    pub engine_report: EngineReport,
    pub renderer_state: RendererState,
    pub events: Vec<SessionEvent>,
}

pub(super) fn build(session: &Session) -> PipelinePayload {
    let events = session.events().to_vec();

    let runtime_ms = session.runtime_ms();
    let transcript_duration_ms = session.transcript_duration_ms();
    let speedup_vs_realtime = if runtime_ms > 0 && transcript_duration_ms > 0 {
        round4(transcript_duration_ms as f64 / runtime_ms as f64)
    } else {
        0.0
    };

    let meta = Meta {
        mode: "live_session".to_string(),
        input_chunk_count: session.chunk_count(),
        runtime_ms,
        transcript_duration_ms,
        speedup_vs_realtime,
    };

    let e2e: Vec<f64> = events.iter().map(|e| e.e2e_latency_ms).collect();
    let update_lat: Vec<f64> = events.iter().map(|e| e.update.processing_latency_ms as f64).collect();
    let render_lat: Vec<f64> = events.iter().map(|e| e.render_latency_ms as f64).collect();
    let update_duration: Vec<f64> = events.iter().map(|e| e.update.duration_ms as f64).collect();
    let tokens_per_update: Vec<f64> = events.iter().map(|e| e.update.token_count as f64).collect();

    let labeled: Vec<&SessionEvent> = events.iter().filter(|e| e.gold_intent.is_some()).collect();
    let intent_labeled_eval_count = labeled.len();
    let intent_labeled_accuracy = if labeled.is_empty() {
        None
    } else {
        let correct = labeled.iter().filter(|e| e.intent_correct == Some(true)).count();
        Some(round4(correct as f64 / labeled.len() as f64))
    };

    let mut intent_distribution: HashMap<String, usize> = HashMap::new();
    let mut boundary_distribution: HashMap<String, usize> = HashMap::new();
    for e in &events {
        *intent_distribution.entry(e.update.intent_type.as_str().to_string()).or_insert(0) += 1;
        *boundary_distribution
            .entry(boundary_reason_str(e.update.boundary_reason).to_string())
            .or_insert(0) += 1;
    }

    let renderer_stability = session.renderer().summary();

    let summary = Summary {
        updates_emitted: events.len(),
        latency_e2e_ms: StatPack::from_values(&e2e),
        latency_update_ms: StatPack::from_values(&update_lat),
        latency_render_ms: StatPack::from_values(&render_lat),
        intent_labeled_eval_count,
        intent_labeled_accuracy,
        intent_runtime_distribution: intent_distribution.clone(),
        boundary_distribution: boundary_distribution.clone(),
        renderer_stability,
    };

    let engine_report = EngineReport {
        updates_emitted: events.len(),
        current_wait_k: session.current_wait_k(),
        intent_distribution,
        boundary_distribution,
        latency_ms: StatPack::from_values(&update_lat),
        update_duration_ms: StatPack::from_values(&update_duration),
        tokens_per_update: StatPack::from_values(&tokens_per_update),
    };

    PipelinePayload {
        meta,
        summary,
        engine_report,
        renderer_state: session.renderer().export_state(),
        events,
    }
}

fn boundary_reason_str(reason: crate::segmentation::BoundaryReason) -> &'static str {
    use crate::segmentation::BoundaryReason::*;
    match reason {
        SilenceGap => "silence_gap",
        MaxWindowMs => "max_window_ms",
        SentenceEnd => "sentence_end",
        DiscourseMarker => "discourse_marker",
        TokenBudget => "token_budget",
        StreamEnd => "stream_end",
    }
}

fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}
