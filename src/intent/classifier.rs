//! Pure rule-based intent classification and keyword extraction.

use std::collections::HashMap;

use regex::Regex;
use std::sync::OnceLock;

use super::keywords::{cjk_keywords, keyword_index, IntentClass};
use crate::segmentation::tokenize;

const MAX_KEYWORDS: usize = 8;
const PHRASE_MAX_LEN: usize = 20;

/// Result of classifying one segment's joined text.
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: IntentClass,
    pub confidence: f64,
    pub scores: HashMap<&'static str, f64>,
    /// Priority-ordered keywords (domain hits, then phrases, then
    /// frequency-ranked alphanumeric tokens), capped at 8, falling back to
    /// `["core_step"]` when nothing survives extraction.
    pub keywords: Vec<String>,
}

fn alnum_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9_]{3,}$").unwrap())
}

fn phrase_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[，。！？；;,.!?]+").unwrap())
}

/// Classify `text` and extract its keyword list in one pass, since both are
/// pure functions of the same tokenization.
pub fn classify(text: &str) -> Classification {
    let lower = text.to_lowercase();
    let tokens = tokenize(&lower);

    let (intent, confidence, scores) = classify_tokens(&lower, &tokens);
    let keywords = extract_keywords(text, &lower, &tokens);

    Classification {
        intent,
        confidence,
        scores,
        keywords,
    }
}

fn classify_tokens(lower: &str, tokens: &[String]) -> (IntentClass, f64, HashMap<&'static str, f64>) {
    if tokens.is_empty() {
        let mut scores = HashMap::new();
        scores.insert("generic", 1.0);
        return (IntentClass::Generic, 0.35, scores);
    }

    let index = keyword_index();
    let mut hits: HashMap<IntentClass, usize> = HashMap::new();
    for t in tokens {
        if let Some(class) = index.get(t.as_str()) {
            *hits.entry(*class).or_insert(0) += 1;
        }
    }
    // CJK keywords may appear inside unsegmented phrases without being an
    // exact token; also scan the raw lower-cased text for them.
    for (kw, class) in cjk_keywords() {
        if lower.contains(kw) {
            *hits.entry(*class).or_insert(0) += 1;
        }
    }

    if hits.is_empty() {
        let conf = (0.42 + tokens.len() as f64 / 100.0).min(0.55);
        let mut scores = HashMap::new();
        scores.insert("generic", conf);
        return (IntentClass::Generic, conf, scores);
    }

    let total_hits: usize = hits.values().sum();
    // Declaration order is the tie-break: only a strictly greater count
    // replaces the current leader, so the first class reached keeps ties.
    let mut top_intent = IntentClass::ORDERED[0];
    let mut top_hits = 0usize;
    for class in IntentClass::ORDERED {
        if let Some(&h) = hits.get(&class) {
            if h > top_hits {
                top_intent = class;
                top_hits = h;
            }
        }
    }

    let ratio = top_hits as f64 / total_hits.max(1) as f64;
    let density = (total_hits as f64 / tokens.len().max(1) as f64).min(1.0);
    let confidence = (0.45 + 0.40 * ratio + 0.15 * density).clamp(0.35, 0.96);

    let scores = hits
        .into_iter()
        .map(|(class, h)| (class.as_str(), h as f64 / total_hits.max(1) as f64))
        .collect();

    (top_intent, confidence, scores)
}

fn extract_keywords(original_text: &str, lower: &str, tokens: &[String]) -> Vec<String> {
    let index = keyword_index();

    // Domain hits: longest keyword first, then lexicographic, matching
    // against the raw lower-cased text (not just tokens).
    let mut domain_keys: Vec<&'static str> = index.keys().copied().collect();
    domain_keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let domain_hits: Vec<String> = domain_keys
        .into_iter()
        .filter(|kw| lower.contains(kw))
        .map(|kw| kw.to_string())
        .collect();

    // Short phrases split on common sentence/clause punctuation.
    let mut phrase_candidates = Vec::new();
    for raw in phrase_split_re().split(original_text) {
        let p = raw.trim();
        if p.is_empty() {
            continue;
        }
        let truncated: String = p.chars().take(PHRASE_MAX_LEN).collect();
        if truncated.chars().count() >= 2 {
            phrase_candidates.push(truncated);
        }
    }

    // Frequency-ranked alphanumeric tokens (length >= 3), ties broken by
    // longer-then-lexicographic.
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for t in tokens {
        if alnum_token_re().is_match(t) {
            *freq.entry(t.as_str()).or_insert(0) += 1;
        }
    }
    let mut alpha_candidates: Vec<&str> = freq.keys().copied().collect();
    alpha_candidates.sort_by(|a, b| {
        freq[b]
            .cmp(&freq[a])
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.cmp(b))
    });

    let mut merged = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for candidate in domain_hits
        .into_iter()
        .chain(phrase_candidates)
        .chain(alpha_candidates.into_iter().map(|s| s.to_string()))
    {
        let key = candidate.to_lowercase();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        merged.push(candidate);
        if merged.len() >= MAX_KEYWORDS {
            break;
        }
    }

    if merged.is_empty() {
        vec!["core_step".to_string()]
    } else {
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_generic_with_floor_confidence() {
        let c = classify("");
        assert_eq!(c.intent, IntentClass::Generic);
        assert_eq!(c.confidence, 0.35);
    }

    #[test]
    fn no_keyword_hits_falls_back_to_weak_generic() {
        let c = classify("hello world today");
        assert_eq!(c.intent, IntentClass::Generic);
        assert!(c.confidence <= 0.55);
    }

    #[test]
    fn sequential_keywords_drive_sequential_intent() {
        let c = classify("first capture sensor data then normalize and filter");
        assert_eq!(c.intent, IntentClass::Sequential);
        assert!(c.confidence >= 0.35 && c.confidence <= 0.96);
    }

    #[test]
    fn structural_keywords_drive_structural_intent() {
        let c = classify("gateway module connects to auth service and data service");
        assert_eq!(c.intent, IntentClass::Structural);
    }

    #[test]
    fn cjk_substring_keyword_matches_without_spaces() {
        let c = classify("实体关联数据库的主键设计");
        assert_eq!(c.intent, IntentClass::Relational);
    }

    #[test]
    fn tie_break_prefers_first_declared_class() {
        // one sequential hit ("first") and one structural hit ("module"):
        // declaration order puts sequential ahead of structural.
        let c = classify("first module");
        assert_eq!(c.intent, IntentClass::Sequential);
    }

    #[test]
    fn empty_extraction_falls_back_to_core_step() {
        // Tokens below the 3-char alnum floor and no domain/phrase hits.
        let c = classify("is it ok");
        assert_eq!(c.keywords, vec!["core_step".to_string()]);
    }

    #[test]
    fn keywords_are_capped_at_eight() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let c = classify(text);
        assert!(c.keywords.len() <= 8);
    }
}
