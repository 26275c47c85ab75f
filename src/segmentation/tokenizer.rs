//! Tokenization and the shared stop-word set.
//!
//! Lower-case the input, extract maximal runs of `[a-z0-9_]+` or CJK
//! ideographs, split long CJK runs into non-overlapping 2-char pieces, and
//! drop a fixed stop-word list covering English function words and
//! Chinese particles.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const CJK_SPLIT_THRESHOLD: usize = 3;
const CJK_PIECE_LEN: usize = 2;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z0-9_]+|[\u{4e00}-\u{9fff}]+").unwrap())
}

fn stopwords() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            "the", "a", "an", "to", "of", "in", "on", "for", "and", "or", "we", "you", "it",
            "is", "are", "be", "this", "that", "with", "as", "by", "把", "的", "了", "在", "和",
            "与", "并", "就", "先", "再", "一个", "这里", "这个", "那个",
        ]
        .into_iter()
        .collect()
    })
}

/// Tokenize `text`: lower-case, extract `[a-z0-9_]+`/CJK runs, split long
/// CJK runs into 2-char pieces (step 2, no overlap), drop stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let stop = stopwords();
    let mut tokens = Vec::new();

    for run in token_regex().find_iter(&lower) {
        let run = run.as_str();
        if is_cjk_run(run) {
            let chars: Vec<char> = run.chars().collect();
            if chars.len() <= CJK_SPLIT_THRESHOLD {
                push_if_kept(&mut tokens, run, stop);
            } else {
                let mut i = 0;
                while i < chars.len() {
                    let end = (i + CJK_PIECE_LEN).min(chars.len());
                    let piece: String = chars[i..end].iter().collect();
                    if piece.chars().count() >= CJK_PIECE_LEN {
                        push_if_kept(&mut tokens, &piece, stop);
                    }
                    i += CJK_PIECE_LEN;
                }
            }
        } else {
            push_if_kept(&mut tokens, run, stop);
        }
    }
    tokens
}

fn is_cjk_run(run: &str) -> bool {
    run.chars().next().map(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)).unwrap_or(false)
}

fn push_if_kept(tokens: &mut Vec<String>, candidate: &str, stop: &HashSet<&'static str>) {
    if candidate.is_empty() || stop.contains(candidate) {
        return;
    }
    tokens.push(candidate.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_tokenization_drops_stopwords() {
        let toks = tokenize("The gateway module connects to the auth service");
        assert_eq!(toks, vec!["gateway", "module", "connects", "auth", "service"]);
    }

    #[test]
    fn short_cjk_run_kept_whole() {
        let toks = tokenize("流程");
        assert_eq!(toks, vec!["流程"]);
    }

    #[test]
    fn long_cjk_run_split_into_2char_pieces() {
        // 7 chars -> pieces of 2,2,2,1(dropped, <2 chars)
        let toks = tokenize("实体关联数据库");
        assert_eq!(toks, vec!["实体", "关联", "数据"]);
    }

    #[test]
    fn chinese_stopwords_dropped() {
        let toks = tokenize("把这个放在这里");
        // all tokens here are either stopwords or 2-char stopword-adjacent pieces
        assert!(!toks.iter().any(|t| t == "把" || t == "的"));
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
