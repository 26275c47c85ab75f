//! The pending-chunk aggregate and the boundary predicate that decides
//! when it closes into a dispatched segment.

use serde::{Deserialize, Serialize};

use super::tokenizer::tokenize;
use crate::transcript::TranscriptChunk;

const MIN_TOK: usize = 6;
const MAX_WIN_MS: i64 = 3800;
const SILENCE_MS: i64 = 1200;
const BUDGET_PER_K: usize = 18;

const DISCOURSE_MARKERS: &[&str] = &[
    "then", "next", "finally", "meanwhile", "然后", "接着", "另外", "最后",
];

const SENTENCE_END_CHARS: &[char] = &['.', '!', '?', '。', '！', '？'];

/// Why a segment was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryReason {
    SilenceGap,
    MaxWindowMs,
    SentenceEnd,
    DiscourseMarker,
    TokenBudget,
    StreamEnd,
}

impl BoundaryReason {
    /// Hard boundaries fire regardless of wait-k; soft ones need
    /// `pending_chunk_count >= current_wait_k`.
    fn is_hard(self) -> bool {
        matches!(self, BoundaryReason::SilenceGap | BoundaryReason::MaxWindowMs)
    }
}

/// A closed segment ready for the intent classifier.
pub struct DispatchedSegment {
    pub chunks: Vec<TranscriptChunk>,
    pub reason: BoundaryReason,
    pub token_count: usize,
}

/// Holds chunks for one in-progress segment and decides when to close it.
pub struct SegmentationBuffer {
    pending: Vec<TranscriptChunk>,
    token_count: usize,
    current_wait_k: usize,
    /// Timestamp of the last chunk ingested, engine-wide -- survives a
    /// dispatch clearing `pending` so a silence gap can still fire on the
    /// first chunk of a new segment.
    last_ingested_ts: Option<i64>,
}

impl SegmentationBuffer {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            token_count: 0,
            current_wait_k: 2,
            last_ingested_ts: None,
        }
    }

    /// Append a chunk (empty-text chunks are rejected, never buffered) and
    /// report whether a boundary fired.
    pub fn ingest(&mut self, chunk: TranscriptChunk, current_wait_k: usize) -> Option<DispatchedSegment> {
        if chunk.trimmed_text().is_empty() {
            return None;
        }
        self.current_wait_k = current_wait_k;

        let gap_ms = self
            .last_ingested_ts
            .map(|prev_ts| {
                let raw_gap = chunk.timestamp_ms - prev_ts;
                if raw_gap < 0 {
                    tracing::warn!(
                        prev_ts = prev_ts,
                        chunk_ts = chunk.timestamp_ms,
                        "backward timestamp jump, treating gap as zero"
                    );
                }
                raw_gap.max(0)
            })
            .unwrap_or(0);
        self.last_ingested_ts = Some(chunk.timestamp_ms);

        self.token_count += tokenize(chunk.trimmed_text()).len();
        self.pending.push(chunk);

        let reason = self.boundary_reason(gap_ms)?;
        if reason.is_hard() || self.pending.len() >= current_wait_k {
            Some(self.dispatch(reason))
        } else {
            None
        }
    }

    /// Close whatever is pending, regardless of boundary state.
    pub fn flush(&mut self) -> Option<DispatchedSegment> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.dispatch(BoundaryReason::StreamEnd))
    }

    fn boundary_reason(&self, gap_ms: i64) -> Option<BoundaryReason> {
        let oldest = self.pending.first()?;
        let newest = self.pending.last()?;
        let window_ms = newest.timestamp_ms - oldest.timestamp_ms;
        let text = newest.trimmed_text();
        let tokens = self.token_count;

        if gap_ms >= SILENCE_MS && tokens >= MIN_TOK {
            return Some(BoundaryReason::SilenceGap);
        }
        if window_ms >= MAX_WIN_MS {
            return Some(BoundaryReason::MaxWindowMs);
        }
        if tokens >= MIN_TOK && text.ends_with(SENTENCE_END_CHARS) {
            return Some(BoundaryReason::SentenceEnd);
        }
        if tokens >= MIN_TOK && starts_with_discourse_marker(text) {
            return Some(BoundaryReason::DiscourseMarker);
        }
        if tokens >= self.current_wait_k * BUDGET_PER_K {
            return Some(BoundaryReason::TokenBudget);
        }
        None
    }

    fn dispatch(&mut self, reason: BoundaryReason) -> DispatchedSegment {
        let chunks = std::mem::take(&mut self.pending);
        let token_count = self.token_count;
        self.token_count = 0;
        DispatchedSegment {
            chunks,
            reason,
            token_count,
        }
    }
}

impl Default for SegmentationBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn starts_with_discourse_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    DISCOURSE_MARKERS.iter().any(|m| lower.starts_with(m))
}
