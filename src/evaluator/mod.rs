//! Evaluator (component H): pure, synchronous scoring over a pipeline
//! payload, plus the standalone dataset-readiness formula.

pub mod dataset;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::session::PipelinePayload;

/// Threshold set a realtime evaluation is checked against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalThresholds {
    pub latency_p95_threshold_ms: f64,
    pub flicker_mean_threshold: f64,
    pub mental_map_min: f64,
    pub intent_accuracy_threshold: f64,
}

impl Default for EvalThresholds {
    fn default() -> Self {
        Self {
            latency_p95_threshold_ms: 2000.0,
            flicker_mean_threshold: 6.0,
            mental_map_min: 0.85,
            intent_accuracy_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalChecks {
    pub latency_p95_ok: bool,
    pub flicker_mean_ok: bool,
    pub mental_map_ok: bool,
    pub intent_accuracy_ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub mode: String,
    pub runtime_ms: f64,
    pub transcript_duration_ms: f64,
    pub runtime_over_transcript_ratio: Option<f64>,
    pub e2e_latency_p95_ms: f64,
    pub flicker_mean: f64,
    pub mental_map_mean: f64,
    pub intent_accuracy: Option<f64>,
    pub intent_macro_f1: Option<f64>,
    pub updates_emitted: usize,
    pub intent_labeled_eval_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub realtime_eval_pass: bool,
    pub checks: EvalChecks,
    pub thresholds: EvalThresholds,
    pub metrics: EvalMetrics,
    pub notes: Vec<String>,
}

/// Evaluate one pipeline payload (live session snapshot or offline run)
/// against the realtime readiness thresholds.
pub fn evaluate_payload(payload: &PipelinePayload, thresholds: EvalThresholds) -> EvalReport {
    let e2e_p95 = payload.summary.latency_e2e_ms.p95;
    let flicker_mean = payload.summary.renderer_stability.flicker_index.mean;
    let mental_mean = payload.summary.renderer_stability.mental_map_score.mean;
    let intent_acc = payload.summary.intent_labeled_accuracy;

    let pairs: Vec<(Option<String>, String)> = payload
        .events
        .iter()
        .map(|e| (e.gold_intent.clone(), e.update.intent_type.as_str().to_string()))
        .collect();
    let macro_f1 = macro_f1(&pairs);

    let checks = EvalChecks {
        latency_p95_ok: e2e_p95 <= thresholds.latency_p95_threshold_ms,
        flicker_mean_ok: flicker_mean <= thresholds.flicker_mean_threshold,
        mental_map_ok: mental_mean >= thresholds.mental_map_min,
        intent_accuracy_ok: intent_acc.map_or(true, |a| a >= thresholds.intent_accuracy_threshold),
    };
    let realtime_eval_pass =
        checks.latency_p95_ok && checks.flicker_mean_ok && checks.mental_map_ok && checks.intent_accuracy_ok;

    let transcript_ms = payload.meta.transcript_duration_ms as f64;
    let runtime_ms = payload.meta.runtime_ms as f64;
    let runtime_over_transcript_ratio = if transcript_ms > 0.0 {
        Some(round4(runtime_ms / transcript_ms))
    } else {
        None
    };

    let metrics = EvalMetrics {
        mode: payload.meta.mode.clone(),
        runtime_ms,
        transcript_duration_ms: transcript_ms,
        runtime_over_transcript_ratio,
        e2e_latency_p95_ms: e2e_p95,
        flicker_mean,
        mental_map_mean: mental_mean,
        intent_accuracy: intent_acc,
        intent_macro_f1: macro_f1.map(round4),
        updates_emitted: payload.summary.updates_emitted,
        intent_labeled_eval_count: payload.summary.intent_labeled_eval_count,
    };

    EvalReport {
        realtime_eval_pass,
        checks,
        thresholds,
        metrics,
        notes: vec![
            "intent metrics are only computed when expected_intent exists in transcript chunks".to_string(),
            "realtime ratio around 1.0 indicates near real-time replay; <1.0 means faster-than-realtime processing"
                .to_string(),
        ],
    }
}

/// Unweighted mean of per-label F1 over non-null `(gold, pred)` pairs.
/// `None` when no pair has a gold label.
fn macro_f1(pairs: &[(Option<String>, String)]) -> Option<f64> {
    let filtered: Vec<(&str, &str)> = pairs
        .iter()
        .filter_map(|(g, p)| g.as_deref().map(|g| (g, p.as_str())))
        .collect();
    if filtered.is_empty() {
        return None;
    }

    let mut labels: BTreeSet<&str> = BTreeSet::new();
    for (g, p) in &filtered {
        labels.insert(g);
        labels.insert(p);
    }

    let mut f1_sum = 0.0;
    for label in &labels {
        let tp = filtered.iter().filter(|(g, p)| g == label && p == label).count();
        let fp = filtered.iter().filter(|(g, p)| g != label && p == label).count();
        let fn_ = filtered.iter().filter(|(g, p)| g == label && p != label).count();
        let denom = 2 * tp + fp + fn_;
        let f1 = if denom > 0 { 2.0 * tp as f64 / denom as f64 } else { 0.0 };
        f1_sum += f1;
    }
    Some(f1_sum / labels.len().max(1) as f64)
}

fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_f1_none_when_no_gold_labels() {
        let pairs = vec![(None, "sequential".to_string())];
        assert_eq!(macro_f1(&pairs), None);
    }

    #[test]
    fn macro_f1_is_one_on_perfect_agreement() {
        let pairs = vec![
            (Some("sequential".to_string()), "sequential".to_string()),
            (Some("structural".to_string()), "structural".to_string()),
        ];
        assert_eq!(macro_f1(&pairs), Some(1.0));
    }

    #[test]
    fn macro_f1_penalizes_disagreement() {
        let pairs = vec![
            (Some("sequential".to_string()), "structural".to_string()),
            (Some("structural".to_string()), "structural".to_string()),
        ];
        let f1 = macro_f1(&pairs).unwrap();
        assert!(f1 < 1.0 && f1 > 0.0);
    }
}
