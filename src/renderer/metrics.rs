//! Percentile helper and per-frame stability scalars.

/// Nearest-rank percentile over `values` (not assumed pre-sorted).
/// `p` in `[0, 100]`.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 100.0 {
        return sorted[sorted.len() - 1];
    }
    let raw = ((sorted.len() - 1) as f64) * p / 100.0;
    sorted[round_half_to_even(raw) as usize]
}

/// Python's `round()` semantics (round-half-to-even), used for the
/// nearest-rank percentile index so ties land the same way the reference
/// implementation's `round()` does.
fn round_half_to_even(x: f64) -> i64 {
    let floor = x.floor();
    let diff = x - floor;
    let floor_i = floor as i64;
    if diff < 0.5 {
        floor_i
    } else if diff > 0.5 {
        floor_i + 1
    } else if floor_i % 2 == 0 {
        floor_i
    } else {
        floor_i + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_yield_zero() {
        assert_eq!(percentile(&[], 95.0), 0.0);
    }

    #[test]
    fn p95_nearest_rank_on_small_set() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 95.0), 5.0);
    }

    #[test]
    fn p0_and_p100_are_extremes() {
        let values = vec![3.0, 1.0, 2.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 3.0);
    }

    #[test]
    fn tied_index_rounds_to_even_like_python() {
        // (3-1)*25/100 = 0.5 exactly; round-half-to-even keeps index 0.
        let values = vec![10.0, 20.0, 30.0];
        assert_eq!(percentile(&values, 25.0), 10.0);
    }
}
