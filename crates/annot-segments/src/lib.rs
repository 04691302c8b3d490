//! Temporal segment algebra for the annot pipeline.
//!
//! This crate holds the pipeline's core policy:
//! - [`filter`]: scored frames → qualifying raw intervals under a
//!   music/speech classification rule
//! - [`merge`]: raw intervals → maximal runs under a gap tolerance, with a
//!   minimum-duration filter
//! - [`attribute`]: good segments × diarization turns → speaker-attributed
//!   sub-intervals
//! - [`table`]: the CSV boundary the collaborators speak, with fail-fast
//!   validation and atomic writes
//!
//! The algebra is synchronous and operates on in-memory tables; all I/O
//! happens at the [`table`] boundary before or after a component runs.

pub mod attribute;
pub mod error;
pub mod filter;
pub mod merge;
pub mod table;

// Re-export common types
pub use attribute::match_speakers;
pub use error::{SegmentError, SegmentResult};
pub use filter::{filter_frames, FilterConfig, FilterMode};
pub use merge::{merge_intervals, MergeConfig, DEFAULT_MAX_GAP};
pub use table::{
    read_matched_segments, read_scored_frames, read_segments, read_turns,
    write_matched_segments, write_segments, MalformedPolicy,
};
