//! Segmentation + classification + wait-k + operation synthesis, wired
//! into one per-session engine (components B through E). Rendering is a
//! separate concern owned by the session (component F runs against the
//! same update but keeps its own persistent graph).

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::intent::{self, IntentClass};
use crate::operations::{self, Operation};
use crate::segmentation::{tokenize, BoundaryReason, SegmentationBuffer};
use crate::transcript::TranscriptChunk;
use crate::waitk::{WaitKConfig, WaitKController};

/// Output of segmentation + classification + wait-k + operation synthesis
/// for one dispatched segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingUpdate {
    pub update_id: u64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub duration_ms: i64,
    pub boundary_reason: BoundaryReason,
    pub intent_type: IntentClass,
    pub intent_confidence: f64,
    pub wait_k_used: usize,
    pub token_count: usize,
    pub chunk_count: usize,
    pub keywords: Vec<String>,
    pub operations: Vec<Operation>,
    pub transcript_text: String,
    pub processing_latency_ms: i64,
}

/// One session's B-through-E engine: owns the segmentation buffer and
/// wait-k state, assigns monotonic `update_id`s, and stamps processing
/// latency from chunk arrival to dispatch.
pub struct Pipeline {
    buffer: SegmentationBuffer,
    waitk: WaitKController,
    update_id: u64,
    pending_arrivals: Vec<Instant>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_wait_k_config(WaitKConfig::default())
    }

    pub fn with_wait_k_config(config: WaitKConfig) -> Self {
        Self {
            buffer: SegmentationBuffer::new(),
            waitk: WaitKController::with_config(config),
            update_id: 0,
            pending_arrivals: Vec::new(),
        }
    }

    pub fn current_wait_k(&self) -> usize {
        self.waitk.current_wait_k()
    }

    /// Ingest one chunk, returning an update if a boundary fired.
    pub fn ingest(&mut self, chunk: TranscriptChunk) -> Option<StreamingUpdate> {
        if chunk.trimmed_text().is_empty() {
            return None;
        }
        self.pending_arrivals.push(Instant::now());
        let wait_k = self.waitk.current_wait_k();
        let segment = self.buffer.ingest(chunk, wait_k)?;
        Some(self.finish(segment.chunks, segment.reason))
    }

    /// Close out any pending chunks as a `stream_end` update.
    pub fn flush(&mut self) -> Option<StreamingUpdate> {
        let segment = self.buffer.flush()?;
        Some(self.finish(segment.chunks, segment.reason))
    }

    fn finish(&mut self, chunks: Vec<TranscriptChunk>, reason: BoundaryReason) -> StreamingUpdate {
        self.update_id += 1;

        let arrivals = std::mem::take(&mut self.pending_arrivals);
        let oldest_arrival = arrivals.into_iter().min();
        let processing_latency_ms = oldest_arrival
            .map(|t| Instant::now().duration_since(t).as_millis() as i64)
            .unwrap_or(0);

        let start_ms = chunks.first().map(|c| c.timestamp_ms).unwrap_or(0);
        let end_ms = chunks.last().map(|c| c.timestamp_ms).unwrap_or(start_ms);
        let duration_ms = (end_ms - start_ms).max(0);

        let joined = chunks
            .iter()
            .map(|c| c.trimmed_text())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let tokens = tokenize(&joined);
        let classification = intent::classify(&joined);
        // wait_k_used records the value *after* this dispatch's update, the
        // one that will gate the next segment's soft boundaries.
        self.waitk.update(classification.confidence, &classification.keywords);
        let wait_k_used = self.waitk.current_wait_k();

        let operations = operations::synthesize(self.update_id, &classification.keywords, classification.intent);

        StreamingUpdate {
            update_id: self.update_id,
            start_ms,
            end_ms,
            duration_ms,
            boundary_reason: reason,
            intent_type: classification.intent,
            intent_confidence: classification.confidence,
            wait_k_used,
            token_count: tokens.len(),
            chunk_count: chunks.len(),
            keywords: classification.keywords,
            operations,
            transcript_text: joined,
            processing_latency_ms,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(ts: i64, text: &str) -> TranscriptChunk {
        TranscriptChunk::new(ts, text)
    }

    #[test]
    fn update_ids_are_dense_and_increasing() {
        let mut p = Pipeline::new();
        let u1 = p.ingest(chunk(0, "first capture sensor data.")).unwrap();
        assert_eq!(u1.update_id, 1);
        let u2 = p.ingest(chunk(450, "then normalize data streams now.")).unwrap();
        assert_eq!(u2.update_id, 2);
    }

    #[test]
    fn flush_with_nothing_pending_yields_none() {
        let mut p = Pipeline::new();
        assert!(p.flush().is_none());
    }

    #[test]
    fn empty_chunk_is_ignored() {
        let mut p = Pipeline::new();
        assert!(p.ingest(chunk(0, "   ")).is_none());
    }

    #[test]
    fn sequential_chain_scenario_ends_with_stream_end_flush() {
        let mut p = Pipeline::new();
        let mut updates = Vec::new();
        for (ts, text) in [
            (0, "first capture sensor data"),
            (450, "then normalize and filter"),
            (900, "next compute feature windows"),
            (1400, "finally write result."),
        ] {
            if let Some(u) = p.ingest(chunk(ts, text)) {
                updates.push(u);
            }
        }
        if let Some(u) = p.flush() {
            updates.push(u);
        }
        assert!(!updates.is_empty());
        assert!(updates.iter().any(|u| u.intent_type == IntentClass::Sequential));
    }

    #[test]
    fn structural_single_chunk_flush_builds_hub_and_spoke() {
        let mut p = Pipeline::new();
        assert!(p
            .ingest(chunk(0, "gateway module connects to auth service and data service."))
            .is_none());
        let update = p.flush().expect("flush should close the pending segment");
        assert_eq!(update.intent_type, IntentClass::Structural);
        let edges: Vec<_> = update
            .operations
            .iter()
            .filter(|o| matches!(o, Operation::AddEdge { .. }))
            .collect();
        assert!(!edges.is_empty());
        for e in &edges {
            if let Operation::AddEdge { from, .. } = e {
                assert_eq!(from, "u1_n1");
            }
        }
    }

    #[test]
    fn large_gap_dispatches_pending_segment_as_silence_gap() {
        let mut p = Pipeline::new();
        assert!(p.ingest(chunk(0, "the payment module handles refunds")).is_none());
        // The gap is measured against the chunk that crosses the silence
        // threshold, but that chunk still joins the pending segment it
        // closes -- the dispatched update covers both chunks.
        let update = p
            .ingest(chunk(2000, "the ledger service records transactions"))
            .expect("silence gap should dispatch the pending segment");
        assert_eq!(update.boundary_reason, BoundaryReason::SilenceGap);
        assert_eq!(update.chunk_count, 2);
    }
}
