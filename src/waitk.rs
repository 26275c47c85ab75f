//! Wait-k controller (component D): adapts the lookahead window from
//! classifier confidence and keyword novelty between consecutive segments.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

const CONFIDENT_THRESHOLD: f64 = 0.78;
const STABLE_NOVELTY_THRESHOLD: f64 = 0.35;
const UNCERTAIN_THRESHOLD: f64 = 0.52;
const SURPRISE_NOVELTY_THRESHOLD: f64 = 0.80;

/// Tunable bounds for one session's controller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaitKConfig {
    pub min_wait_k: usize,
    pub base_wait_k: usize,
    pub max_wait_k: usize,
}

impl Default for WaitKConfig {
    fn default() -> Self {
        Self {
            min_wait_k: 1,
            base_wait_k: 2,
            max_wait_k: 4,
        }
    }
}

/// Tracks the previous segment's keyword set and the current wait-k value.
pub struct WaitKController {
    config: WaitKConfig,
    last_keywords: HashSet<String>,
    current_wait_k: usize,
}

impl WaitKController {
    pub fn new() -> Self {
        Self::with_config(WaitKConfig::default())
    }

    pub fn with_config(config: WaitKConfig) -> Self {
        Self {
            current_wait_k: config.base_wait_k,
            config,
            last_keywords: HashSet::new(),
        }
    }

    pub fn current_wait_k(&self) -> usize {
        self.current_wait_k
    }

    /// 1 - Jaccard similarity between the previous and current keyword sets.
    /// The very first segment has no history, so novelty is defined as 1.0.
    fn novelty(&self, keywords: &[String]) -> f64 {
        if self.last_keywords.is_empty() {
            return 1.0;
        }
        let current: HashSet<&str> = keywords.iter().map(String::as_str).collect();
        let prev: HashSet<&str> = self.last_keywords.iter().map(String::as_str).collect();
        let union = prev.union(&current).count();
        if union == 0 {
            return 0.0;
        }
        let overlap = prev.intersection(&current).count() as f64 / union as f64;
        1.0 - overlap
    }

    /// Recompute wait-k from `base_wait_k`, applying at most one widen and
    /// one narrow step, then replace the keyword memory with `keywords`.
    /// Returns the novelty value used, since callers also record it.
    pub fn update(&mut self, confidence: f64, keywords: &[String]) -> f64 {
        let novelty = self.novelty(keywords);

        let mut wait_k = self.config.base_wait_k as i64;
        if confidence >= CONFIDENT_THRESHOLD && novelty <= STABLE_NOVELTY_THRESHOLD {
            wait_k += 1;
        }
        if confidence < UNCERTAIN_THRESHOLD || novelty >= SURPRISE_NOVELTY_THRESHOLD {
            wait_k -= 1;
        }
        self.current_wait_k = wait_k.clamp(self.config.min_wait_k as i64, self.config.max_wait_k as i64) as usize;

        self.last_keywords = keywords.iter().cloned().collect();
        novelty
    }
}

impl Default for WaitKController {
    fn default() -> Self {
        Self::new()
    }
}
