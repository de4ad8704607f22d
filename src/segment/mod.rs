pub mod client;
pub mod pipeline;
pub mod prompt;

pub use client::{parse_turns, GeminiSegmenter, SegmentConfig, Turn};
pub use pipeline::{SegmentCommand, SegmentEvent, SegmentPipeline};
