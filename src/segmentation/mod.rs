//! Segmentation buffer (component B): decides *when* to close a segment.

mod buffer;
mod tokenizer;

pub use buffer::{BoundaryReason, SegmentationBuffer};
pub use tokenizer::tokenize;
