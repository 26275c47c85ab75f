//! Transcript ingestion: chunk types, wire parsing, and replay.
//!
//! This is the external boundary named "Transcript Source" in the system
//! overview. The core never performs speech recognition; it consumes
//! already-tokenized text fragments with timestamps (see `chunk`), reads
//! them from JSON/JSONL/free-form payloads (see `parse`), and can replay a
//! fixed list with realtime timing (see `replay`).

mod chunk;
mod parse;
mod replay;

pub use chunk::TranscriptChunk;
pub use parse::{parse_chunks, ParseError, TranscriptFormat};
pub use replay::{replay_chunks, ReplayConfig};
