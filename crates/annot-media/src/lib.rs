//! FFmpeg CLI wrapper for audio segment extraction.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Duration probing via FFprobe
//! - Stream-copy extraction of segment tables, with margins
//! - Silence detection via the silencedetect filter
//!
//! Everything here is thin orchestration around the external tools; the
//! segment algebra itself lives in `annot-segments` and never touches a
//! subprocess.

pub mod command;
pub mod error;
pub mod extract;
pub mod probe;
pub mod silence;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use extract::{extract_matched_segments, extract_segments, ExtractConfig};
pub use probe::probe_duration;
pub use silence::{detect_silence, SilenceConfig};
