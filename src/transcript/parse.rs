//! Wire-format parsing for transcript chunks.
//!
//! Three input shapes are accepted: a JSON array of chunk objects, JSONL
//! (one object per line), and a free-form newline-separated text mode
//! where each line is `text`, `speaker|text`, or
//! `speaker|text|expected_intent`. A `timestamp_ms` omitted from a JSON
//! row is auto-assigned at 450ms intervals in arrival order, mirroring
//! the reference adapter's `default_interval_ms`. Rows with empty text
//! are dropped, never buffered. The final list is sorted by
//! `timestamp_ms` ascending.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::chunk::TranscriptChunk;

const DEFAULT_INTERVAL_MS: i64 = 450;

/// How to interpret a transcript payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// A JSON array of chunk objects, or `{"chunks": [...]}`.
    Json,
    /// Newline-delimited JSON objects.
    Jsonl,
    /// Newline-delimited `text` / `speaker|text` / `speaker|text|intent`.
    FreeForm,
}

/// Parse failure; all of these are malformed-input, never a panic.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload must be a JSON array or an object with a 'chunks' array")]
    NotAChunkList,
}

#[derive(Debug, Deserialize)]
struct RawChunk {
    timestamp_ms: Option<i64>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    is_final: Option<bool>,
    #[serde(default)]
    expected_intent: Option<String>,
    #[serde(default)]
    metadata: JsonValue,
}

/// Parse a transcript payload in the given format into a chunk list,
/// sorted by `timestamp_ms`. Empty-text rows are silently dropped.
pub fn parse_chunks(payload: &str, format: TranscriptFormat) -> Result<Vec<TranscriptChunk>, ParseError> {
    let raw_rows = match format {
        TranscriptFormat::Json => parse_json_rows(payload)?,
        TranscriptFormat::Jsonl => parse_jsonl_rows(payload)?,
        TranscriptFormat::FreeForm => return Ok(parse_free_form(payload)),
    };

    let mut auto_ts = 0i64;
    let mut chunks = Vec::with_capacity(raw_rows.len());
    for row in raw_rows {
        let text = row.text.trim().to_string();
        if text.is_empty() {
            continue;
        }
        let timestamp_ms = match row.timestamp_ms {
            Some(ts) => ts,
            None => {
                let ts = auto_ts;
                auto_ts += DEFAULT_INTERVAL_MS;
                ts
            }
        };
        chunks.push(TranscriptChunk {
            timestamp_ms,
            text,
            speaker: row.speaker.unwrap_or_else(|| "user".to_string()),
            is_final: row.is_final.unwrap_or(true),
            expected_intent: row.expected_intent,
            metadata: row.metadata,
        });
    }

    chunks.sort_by_key(|c| c.timestamp_ms);
    Ok(chunks)
}

fn parse_json_rows(payload: &str) -> Result<Vec<RawChunk>, ParseError> {
    let value: JsonValue = serde_json::from_str(payload)?;
    let array = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut obj) => match obj.remove("chunks") {
            Some(JsonValue::Array(items)) => items,
            _ => return Err(ParseError::NotAChunkList),
        },
        _ => return Err(ParseError::NotAChunkList),
    };

    array
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(ParseError::from))
        .collect()
}

fn parse_jsonl_rows(payload: &str) -> Result<Vec<RawChunk>, ParseError> {
    let mut rows = Vec::new();
    for line in payload.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(line)?);
    }
    Ok(rows)
}

/// `text`, `speaker|text`, or `speaker|text|expected_intent` per line.
/// Timestamps are always auto-assigned at 450ms intervals since the
/// free-form mode carries no timing information.
fn parse_free_form(payload: &str) -> Vec<TranscriptChunk> {
    let mut chunks = Vec::new();
    let mut auto_ts = 0i64;
    for line in payload.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.splitn(3, '|').collect();
        let (speaker, text, expected_intent) = match parts.as_slice() {
            [text] => ("user".to_string(), text.trim(), None),
            [speaker, text] => (speaker.trim().to_string(), text.trim(), None),
            [speaker, text, intent] => (
                speaker.trim().to_string(),
                text.trim(),
                Some(intent.trim().to_string()),
            ),
            _ => continue,
        };
        if text.is_empty() {
            continue;
        }
        let mut chunk = TranscriptChunk::new(auto_ts, text);
        chunk.speaker = speaker;
        chunk.expected_intent = expected_intent;
        chunks.push(chunk);
        auto_ts += DEFAULT_INTERVAL_MS;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array_parses_and_sorts() {
        let payload = r#"[
            {"timestamp_ms": 900, "text": "second"},
            {"timestamp_ms": 0, "text": "first"}
        ]"#;
        let chunks = parse_chunks(payload, TranscriptFormat::Json).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "first");
        assert_eq!(chunks[1].text, "second");
    }

    #[test]
    fn json_object_wrapper_reads_chunks_key() {
        let payload = r#"{"chunks": [{"timestamp_ms": 0, "text": "hi"}]}"#;
        let chunks = parse_chunks(payload, TranscriptFormat::Json).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn missing_timestamp_auto_assigned_in_arrival_order() {
        let payload = r#"[{"text": "a"}, {"text": "b"}, {"text": "c"}]"#;
        let chunks = parse_chunks(payload, TranscriptFormat::Json).unwrap();
        assert_eq!(chunks[0].timestamp_ms, 0);
        assert_eq!(chunks[1].timestamp_ms, 450);
        assert_eq!(chunks[2].timestamp_ms, 900);
    }

    #[test]
    fn empty_text_rows_are_dropped() {
        let payload = r#"[{"timestamp_ms": 0, "text": ""}, {"timestamp_ms": 1, "text": "ok"}]"#;
        let chunks = parse_chunks(payload, TranscriptFormat::Json).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "ok");
    }

    #[test]
    fn jsonl_parses_each_line() {
        let payload = "{\"timestamp_ms\": 0, \"text\": \"a\"}\n{\"timestamp_ms\": 1, \"text\": \"b\"}\n";
        let chunks = parse_chunks(payload, TranscriptFormat::Jsonl).unwrap();
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn free_form_plain_text_defaults_speaker() {
        let payload = "hello there\nsecond line";
        let chunks = parse_chunks(payload, TranscriptFormat::FreeForm).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].speaker, "user");
        assert_eq!(chunks[1].timestamp_ms, 450);
    }

    #[test]
    fn free_form_speaker_pipe_text() {
        let payload = "alice|hello there";
        let chunks = parse_chunks(payload, TranscriptFormat::FreeForm).unwrap();
        assert_eq!(chunks[0].speaker, "alice");
        assert_eq!(chunks[0].text, "hello there");
    }

    #[test]
    fn free_form_speaker_text_intent() {
        let payload = "alice|first do this|sequential";
        let chunks = parse_chunks(payload, TranscriptFormat::FreeForm).unwrap();
        assert_eq!(chunks[0].expected_intent.as_deref(), Some("sequential"));
    }

    #[test]
    fn not_a_chunk_list_rejected() {
        let payload = "42";
        let err = parse_chunks(payload, TranscriptFormat::Json).unwrap_err();
        assert!(matches!(err, ParseError::NotAChunkList));
    }
}
