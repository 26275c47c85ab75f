//! The unit of pipeline input.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A short speech-recognition text fragment with a logical transcript
/// timestamp. Within one session the consumed sequence is assumed
/// non-decreasing in `timestamp_ms`; a backward jump is tolerated (see
/// `segmentation::buffer`) rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptChunk {
    /// Monotonic transcript clock, milliseconds.
    pub timestamp_ms: i64,
    /// Raw UTF-8 fragment text.
    pub text: String,
    /// Speaker tag, defaults to "user".
    #[serde(default = "default_speaker")]
    pub speaker: String,
    /// Whether this is a finalized ASR hypothesis.
    #[serde(default = "default_is_final")]
    pub is_final: bool,
    /// Ground-truth label carried for evaluation only; never influences
    /// segmentation, classification or rendering.
    #[serde(default)]
    pub expected_intent: Option<String>,
    /// Opaque passthrough metadata.
    #[serde(default)]
    pub metadata: JsonValue,
}

fn default_speaker() -> String {
    "user".to_string()
}

fn default_is_final() -> bool {
    true
}

impl TranscriptChunk {
    /// Construct a chunk with the common fields, defaulting the rest.
    pub fn new(timestamp_ms: i64, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            text: text.into(),
            speaker: default_speaker(),
            is_final: default_is_final(),
            expected_intent: None,
            metadata: JsonValue::Null,
        }
    }

    /// Attach an expected-intent ground-truth label.
    pub fn with_expected_intent(mut self, intent: impl Into<String>) -> Self {
        self.expected_intent = Some(intent.into());
        self
    }

    /// Trimmed text, used throughout segmentation/classification.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}
