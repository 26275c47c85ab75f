//! Real-time transcript-to-graph streaming core for Stream2Graph.
//!
//! Consumes an ordered stream of speech-recognition text fragments and
//! produces, with bounded latency, a sequence of incremental graph-edit
//! events plus per-event visual-stability metrics. Modules are organized
//! leaves-first, mirroring the data flow:
//!
//! transcript -> segmentation -> intent -> waitk -> operations -> renderer
//! -> pipeline -> session -> evaluator -> api

pub mod api;
pub mod config;
pub mod evaluator;
pub mod intent;
pub mod operations;
pub mod pipeline;
pub mod renderer;
pub mod segmentation;
pub mod session;
pub mod stats;
pub mod transcript;
pub mod waitk;

mod error;

pub use error::{StreamError, StreamResult};

/// Crate version, surfaced in health/status responses.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
