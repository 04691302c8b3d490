//! Frame classification: scored frames → qualifying raw intervals.
//!
//! The filter turns the dense per-frame probability table into discrete
//! intervals, one per qualifying frame. It deliberately does no merging of
//! adjacent frames; that is the merger's job. Input frame order (assumed
//! time-ascending) is preserved.

use std::fmt;
use std::str::FromStr;

use annot_models::{Interval, ScoredFrame};
use tracing::debug;

use crate::error::{SegmentError, SegmentResult};

/// Default music-mode thresholds.
pub const DEFAULT_MUSIC_MIN_THRESHOLD: f64 = 0.4;
pub const DEFAULT_SPEECH_MAX_THRESHOLD: f64 = 0.9;

/// Default speech-mode thresholds.
pub const DEFAULT_MUSIC_MAX_THRESHOLD: f64 = 0.2;
pub const DEFAULT_SPEECH_MIN_THRESHOLD: f64 = 0.8;

/// Classification mode: which kind of region qualifies a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Select frames that look like music.
    Music,
    /// Select frames that look like speech.
    Speech,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Speech => "speech",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "music" => Ok(Self::Music),
            "speech" => Ok(Self::Speech),
            other => Err(SegmentError::InvalidMode(other.to_string())),
        }
    }
}

/// Optional threshold overrides for the classification predicate.
///
/// Thresholds that are not relevant to the selected mode are ignored even if
/// supplied; unset thresholds fall back to the mode's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterConfig {
    pub music_min_threshold: Option<f64>,
    pub music_max_threshold: Option<f64>,
    pub speech_min_threshold: Option<f64>,
    pub speech_max_threshold: Option<f64>,
}

impl FilterConfig {
    /// Builder-style setter for the music lower bound (music mode).
    pub fn with_music_min(mut self, threshold: f64) -> Self {
        self.music_min_threshold = Some(threshold);
        self
    }

    /// Builder-style setter for the music upper bound (speech mode).
    pub fn with_music_max(mut self, threshold: f64) -> Self {
        self.music_max_threshold = Some(threshold);
        self
    }

    /// Builder-style setter for the speech lower bound (speech mode).
    pub fn with_speech_min(mut self, threshold: f64) -> Self {
        self.speech_min_threshold = Some(threshold);
        self
    }

    /// Builder-style setter for the speech upper bound (music mode).
    pub fn with_speech_max(mut self, threshold: f64) -> Self {
        self.speech_max_threshold = Some(threshold);
        self
    }
}

/// Resolved predicate bounds for one mode.
#[derive(Debug, Clone, Copy)]
struct Predicate {
    mode: FilterMode,
    lower: f64,
    upper: f64,
}

impl Predicate {
    fn resolve(mode: FilterMode, config: &FilterConfig) -> Self {
        match mode {
            FilterMode::Music => Self {
                mode,
                lower: config
                    .music_min_threshold
                    .unwrap_or(DEFAULT_MUSIC_MIN_THRESHOLD),
                upper: config
                    .speech_max_threshold
                    .unwrap_or(DEFAULT_SPEECH_MAX_THRESHOLD),
            },
            FilterMode::Speech => Self {
                mode,
                lower: config
                    .speech_min_threshold
                    .unwrap_or(DEFAULT_SPEECH_MIN_THRESHOLD),
                upper: config
                    .music_max_threshold
                    .unwrap_or(DEFAULT_MUSIC_MAX_THRESHOLD),
            },
        }
    }

    fn matches(&self, frame: &ScoredFrame) -> bool {
        match self.mode {
            FilterMode::Music => {
                frame.music_prob() > self.lower && frame.speech_prob() < self.upper
            }
            FilterMode::Speech => {
                frame.music_prob() < self.upper && frame.speech_prob() > self.lower
            }
        }
    }
}

/// Select the frames satisfying the mode's predicate, as raw intervals.
///
/// Empty input yields an empty output, not an error.
pub fn filter_frames(
    frames: &[ScoredFrame],
    mode: FilterMode,
    config: &FilterConfig,
) -> SegmentResult<Vec<Interval>> {
    let predicate = Predicate::resolve(mode, config);

    let intervals: Vec<Interval> = frames
        .iter()
        .filter(|frame| predicate.matches(frame))
        .map(|frame| frame.interval())
        .collect();

    debug!(
        mode = %mode,
        total_frames = frames.len(),
        qualifying = intervals.len(),
        lower = predicate.lower,
        upper = predicate.upper,
        "Filtered scored frames"
    );

    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(start: f64, end: f64, music: f64, speech: f64) -> ScoredFrame {
        ScoredFrame::new(start, end, music, speech).unwrap()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("music".parse::<FilterMode>().unwrap(), FilterMode::Music);
        assert_eq!("speech".parse::<FilterMode>().unwrap(), FilterMode::Speech);
        assert!(matches!(
            "noise".parse::<FilterMode>(),
            Err(SegmentError::InvalidMode(m)) if m == "noise"
        ));
    }

    #[test]
    fn test_default_thresholds_borderline_frame() {
        // music_prob = speech_prob = 0.5: music mode selects (0.5 > 0.4 and
        // 0.5 < 0.9), speech mode rejects (0.5 is not < 0.2)
        let frames = vec![frame(0.0, 1.0, 0.5, 0.5)];
        let config = FilterConfig::default();

        let music = filter_frames(&frames, FilterMode::Music, &config).unwrap();
        assert_eq!(music.len(), 1);

        let speech = filter_frames(&frames, FilterMode::Speech, &config).unwrap();
        assert!(speech.is_empty());
    }

    #[test]
    fn test_frames_not_merged() {
        // Two adjacent qualifying frames stay two intervals
        let frames = vec![frame(0.0, 1.0, 0.9, 0.1), frame(1.0, 2.0, 0.9, 0.1)];
        let out = filter_frames(&frames, FilterMode::Music, &FilterConfig::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].end(), 1.0);
        assert_eq!(out[1].start(), 1.0);
    }

    #[test]
    fn test_threshold_overrides() {
        let frames = vec![frame(0.0, 1.0, 0.35, 0.5)];

        // Default music_min 0.4 rejects the frame
        let out = filter_frames(&frames, FilterMode::Music, &FilterConfig::default()).unwrap();
        assert!(out.is_empty());

        // Lowering the bound admits it
        let config = FilterConfig::default().with_music_min(0.3);
        let out = filter_frames(&frames, FilterMode::Music, &config).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_irrelevant_thresholds_ignored() {
        // speech-mode thresholds must not affect music mode
        let frames = vec![frame(0.0, 1.0, 0.5, 0.5)];
        let config = FilterConfig::default().with_music_max(0.0).with_speech_min(1.0);
        let out = filter_frames(&frames, FilterMode::Music, &config).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let out = filter_frames(&[], FilterMode::Music, &FilterConfig::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let frames = vec![
            frame(0.0, 1.0, 0.9, 0.1),
            frame(1.0, 2.0, 0.1, 0.1),
            frame(2.0, 3.0, 0.8, 0.2),
        ];
        let out = filter_frames(&frames, FilterMode::Music, &FilterConfig::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start(), 0.0);
        assert_eq!(out[1].start(), 2.0);
    }
}
