//! Shared data models for the annot pipeline.
//!
//! This crate provides the value types the segment algebra operates on:
//! - Half-open time intervals, plain and speaker-labeled
//! - Per-frame classification scores from the upstream audio model
//! - Timestamp formatting helpers
//!
//! All invariants (`end > start`, probabilities in `[0, 1]`, non-empty
//! speaker labels) are enforced at construction; a value of one of these
//! types is always valid.

pub mod frame;
pub mod interval;
pub mod timestamp;

// Re-export common types
pub use frame::ScoredFrame;
pub use interval::{Interval, IntervalError, LabeledInterval, MatchedInterval};
pub use timestamp::format_seconds;
