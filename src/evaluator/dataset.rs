//! Dataset-readiness scoring: a read-only sweep over a directory of JSON
//! records, producing a 0-100 readiness score fusable with a realtime
//! evaluation report. Consumed externally (CLI only, no HTTP route) per
//! the scope boundary that keeps dataset curation out of this crate.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stats::StatPack;

const INVALID_LICENSES: [&str; 5] = ["", "none", "unknown", "error", "rate_limited"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRatios {
    pub schema_ratio: f64,
    pub compile_success_ratio: f64,
    pub license_valid_ratio: f64,
    pub turn_range_ratio: f64,
    pub diagram_diversity_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEvaluation {
    pub dataset_dir: String,
    pub file_count: usize,
    pub parse_fail_count: usize,
    pub ratios: DatasetRatios,
    pub turn_stats: StatPack,
    pub unique_diagram_types: usize,
    pub dataset_readiness_score: f64,
}

/// Score a directory of `*.json` dataset records per the
/// `0.30*schema + 0.20*compile + 0.15*license + 0.20*turn_range +
/// 0.15*diversity` formula, scaled to [0, 100].
pub fn score_dataset_readiness(dataset_dir: &Path) -> std::io::Result<DatasetEvaluation> {
    let mut files: Vec<_> = fs::read_dir(dataset_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
        .collect();
    files.sort();

    let total = files.len();
    let mut schema_ok = 0usize;
    let mut dialogue_ok = 0usize;
    let mut turn_range_ok = 0usize;
    let mut compile_ok = 0usize;
    let mut license_ok = 0usize;
    let mut parse_fail = 0usize;
    let mut diagram_types: HashMap<String, usize> = HashMap::new();
    let mut turn_counts: Vec<f64> = Vec::new();

    for path in &files {
        let Ok(text) = fs::read_to_string(path) else {
            parse_fail += 1;
            continue;
        };
        let Ok(record) = serde_json::from_str::<Value>(&text) else {
            parse_fail += 1;
            continue;
        };

        let has_id = record.get("id").or_else(|| record.get("record_id")).and_then(Value::as_str).is_some_and(|s| !s.is_empty());
        let has_code = record.get("code").and_then(Value::as_str).is_some_and(|s| !s.is_empty());
        let diagram_type = record.get("diagram_type").and_then(Value::as_str).filter(|s| !s.is_empty());
        let dialogue = record.get("cscw_dialogue").and_then(Value::as_array).filter(|d| !d.is_empty());

        if has_id && has_code && diagram_type.is_some() && dialogue.is_some() {
            schema_ok += 1;
        }
        if let Some(dialogue) = dialogue {
            dialogue_ok += 1;
            let turns = dialogue.len();
            turn_counts.push(turns as f64);
            if (4..=120).contains(&turns) {
                turn_range_ok += 1;
            }
        }

        let compilation_status = record.get("compilation_status").and_then(Value::as_str).unwrap_or("").trim().to_lowercase();
        if compilation_status == "success" {
            compile_ok += 1;
        }

        let license = record
            .get("license_name")
            .or_else(|| record.get("license"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_lowercase();
        if !INVALID_LICENSES.contains(&license.as_str()) {
            license_ok += 1;
        }

        if let Some(diagram_type) = diagram_type {
            *diagram_types.entry(diagram_type.to_string()).or_insert(0) += 1;
        }
    }

    let unique_types = diagram_types.len();
    let schema_ratio = safe_ratio(schema_ok, total);
    let compile_ratio = safe_ratio(compile_ok, total);
    let license_ratio = safe_ratio(license_ok, total);
    let turn_range_ratio = safe_ratio(turn_range_ok, dialogue_ok);
    let diversity_ratio = (unique_types as f64 / 10.0).min(1.0);

    let score = 0.30 * schema_ratio + 0.20 * compile_ratio + 0.15 * license_ratio + 0.20 * turn_range_ratio
        + 0.15 * diversity_ratio;

    Ok(DatasetEvaluation {
        dataset_dir: dataset_dir.display().to_string(),
        file_count: total,
        parse_fail_count: parse_fail,
        ratios: DatasetRatios {
            schema_ratio: round4(schema_ratio),
            compile_success_ratio: round4(compile_ratio),
            license_valid_ratio: round4(license_ratio),
            turn_range_ratio: round4(turn_range_ratio),
            diagram_diversity_ratio: round4(diversity_ratio),
        },
        turn_stats: StatPack::from_values(&turn_counts),
        unique_diagram_types: unique_types,
        dataset_readiness_score: round2(score * 100.0),
    })
}

/// Blend a dataset-readiness score with an optional realtime-evaluation
/// pass ratio; `ready` iff the fused score is at least 80.
pub fn fuse_readiness(dataset_score: f64, realtime_score: Option<f64>) -> (f64, bool) {
    let fused = match realtime_score {
        Some(realtime) => round2(0.7 * dataset_score + 0.3 * realtime),
        None => round2(dataset_score),
    };
    (fused, fused >= 80.0)
}

fn safe_ratio(a: usize, b: usize) -> f64 {
    if b > 0 {
        a as f64 / b as f64
    } else {
        0.0
    }
}

fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_record(dir: &Path, name: &str, json: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(json.as_bytes()).unwrap();
    }

    #[test]
    fn empty_directory_yields_zeroed_score() {
        let dir = std::env::temp_dir().join(format!("s2g_dataset_test_empty_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let eval = score_dataset_readiness(&dir).unwrap();
        assert_eq!(eval.file_count, 0);
        assert_eq!(eval.dataset_readiness_score, 0.0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn well_formed_record_passes_all_checks() {
        let dir = std::env::temp_dir().join(format!("s2g_dataset_test_good_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        write_record(
            &dir,
            "a.json",
            r#"{"id":"a","code":"graph TD; A-->B","diagram_type":"flowchart",
               "cscw_dialogue":["u1","a1","u2","a2"],"license":"mit","compilation_status":"success"}"#,
        );
        let eval = score_dataset_readiness(&dir).unwrap();
        assert_eq!(eval.file_count, 1);
        assert_eq!(eval.ratios.schema_ratio, 1.0);
        assert_eq!(eval.ratios.compile_success_ratio, 1.0);
        assert_eq!(eval.ratios.license_valid_ratio, 1.0);
        assert_eq!(eval.ratios.turn_range_ratio, 1.0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_license_is_excluded() {
        let dir = std::env::temp_dir().join(format!("s2g_dataset_test_license_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        write_record(
            &dir,
            "a.json",
            r#"{"id":"a","code":"x","diagram_type":"flowchart","cscw_dialogue":["u1","a1","u2","a2"],
               "license":"unknown","compilation_status":"success"}"#,
        );
        let eval = score_dataset_readiness(&dir).unwrap();
        assert_eq!(eval.ratios.license_valid_ratio, 0.0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn fused_readiness_blends_seventy_thirty() {
        let (fused, ready) = fuse_readiness(90.0, Some(60.0));
        assert_eq!(fused, 81.0);
        assert!(ready);
    }

    #[test]
    fn dataset_only_readiness_uses_raw_score() {
        let (fused, ready) = fuse_readiness(79.5, None);
        assert_eq!(fused, 79.5);
        assert!(!ready);
    }
}
