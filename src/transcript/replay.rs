//! Replay semantics: bounded-chunk mode and realtime-paced delivery.
//!
//! Timestamps always reflect the transcript clock, never wall-clock. When
//! `realtime` is set, consecutive chunks are released with a wall-clock
//! delay proportional to their timestamp gap divided by `time_scale`
//! (>1.0 = faster than realtime). Sleeping happens on the calling task and
//! never touches the orchestrator lock: the transcript source may
//! terminate replay early without consulting the pipeline.

use tokio::time::Duration;

use super::chunk::TranscriptChunk;

/// Replay tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct ReplayConfig {
    /// Pace gaps against wall-clock time.
    pub realtime: bool,
    /// Realtime speed factor; >1.0 replays faster than the transcript clock.
    pub time_scale: f64,
    /// Stop after this many chunks; 0 means no bound.
    pub max_chunks: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            realtime: false,
            time_scale: 1.0,
            max_chunks: 0,
        }
    }
}

/// Replay a fixed chunk list (already sorted by timestamp) according to
/// `config`, invoking `on_chunk` for each one released. Async so realtime
/// pacing can `tokio::time::sleep` between chunks without blocking a
/// worker thread.
pub async fn replay_chunks<F>(chunks: &[TranscriptChunk], config: ReplayConfig, mut on_chunk: F)
where
    F: FnMut(&TranscriptChunk),
{
    let mut prev_ts: Option<i64> = None;
    let mut emitted = 0usize;

    for chunk in chunks {
        if config.max_chunks > 0 && emitted >= config.max_chunks {
            break;
        }

        if config.realtime {
            if let Some(prev) = prev_ts {
                let gap_ms = (chunk.timestamp_ms - prev).max(0);
                if gap_ms > 0 {
                    let speed = config.time_scale.max(1e-6);
                    let sleep_ms = (gap_ms as f64 / speed).round().max(0.0) as u64;
                    if sleep_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
                    }
                }
            }
        }

        on_chunk(chunk);
        prev_ts = Some(chunk.timestamp_ms);
        emitted += 1;
    }
}
