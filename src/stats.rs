//! Shared count/mean/p50/p95/max summary used for every latency and
//! stability metric series.

use serde::{Deserialize, Serialize};

use crate::renderer::metrics::percentile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatPack {
    pub count: usize,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
}

impl StatPack {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                mean: 0.0,
                p50: 0.0,
                p95: 0.0,
                max: 0.0,
            };
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Self {
            count: values.len(),
            mean,
            p50: median(values),
            p95: percentile(values, 95.0),
            max: values.iter().cloned().fold(f64::MIN, f64::max),
        }
    }
}

/// True median (`statistics.median`): average of the two middle values on
/// an even-length sample, distinct from the nearest-rank `percentile()`
/// used for `p95`.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
