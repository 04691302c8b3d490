//! Half-open time intervals, plain and speaker-labeled.
//!
//! An interval covers `[start, end)` in seconds. The `end > start` invariant
//! is enforced at construction: a degenerate or reversed interval is a
//! validation error, never a silently-retained value.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interval construction/validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    #[error("time value must be finite (got {0})")]
    NonFinite(f64),

    #[error("start time must be non-negative (got {0})")]
    NegativeStart(f64),

    #[error("end ({end}) must be strictly greater than start ({start})")]
    NotAfterStart { start: f64, end: f64 },

    #[error("speaker label must be non-empty")]
    EmptySpeaker,

    #[error("probability must be within [0, 1] (got {0})")]
    ProbabilityOutOfRange(f64),
}

/// Half-open time span `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    start: f64,
    end: f64,
}

impl Interval {
    /// Create a validated interval.
    ///
    /// # Errors
    /// Returns an error if either bound is non-finite, `start` is negative,
    /// or `end <= start`.
    pub fn new(start: f64, end: f64) -> Result<Self, IntervalError> {
        check_finite(start)?;
        check_finite(end)?;
        if start < 0.0 {
            return Err(IntervalError::NegativeStart(start));
        }
        if end <= start {
            return Err(IntervalError::NotAfterStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start time in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds (exclusive).
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Duration in seconds. Always positive.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open overlap test: true when the intervals share more than a
    /// boundary point.
    pub fn overlaps(&self, other: &Interval) -> bool {
        other.end > self.start && other.start < self.end
    }

    /// Clip this interval against another, returning the intersection
    /// `(max(starts), min(ends))`, or `None` when the intersection is empty
    /// or a single boundary point.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end > start {
            Some(Interval { start, end })
        } else {
            None
        }
    }

    /// Total ordering by start time, for sorting interval sequences.
    pub fn cmp_start(&self, other: &Interval) -> Ordering {
        self.start.total_cmp(&other.start)
    }
}

/// A diarization turn: an interval attributed to one speaker.
///
/// Produced by an external diarization model and treated as ground truth;
/// the label is opaque beyond being non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledInterval {
    interval: Interval,
    speaker: String,
}

impl LabeledInterval {
    /// Create a validated labeled interval.
    pub fn new(start: f64, end: f64, speaker: impl Into<String>) -> Result<Self, IntervalError> {
        let interval = Interval::new(start, end)?;
        let speaker = speaker.into();
        if speaker.is_empty() {
            return Err(IntervalError::EmptySpeaker);
        }
        Ok(Self { interval, speaker })
    }

    /// The time span of this turn.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Speaker identifier.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn start(&self) -> f64 {
        self.interval.start
    }

    pub fn end(&self) -> f64 {
        self.interval.end
    }
}

/// A speaker-attributed sub-interval produced by the attributor.
///
/// Immutable once constructed. Sequences of matched intervals are ordered by
/// `start` ascending, then `speaker` ascending, for deterministic downstream
/// consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedInterval {
    interval: Interval,
    speaker: String,
}

impl MatchedInterval {
    /// Build a matched interval from an already-validated clip and its turn's
    /// speaker label.
    pub fn new(interval: Interval, speaker: impl Into<String>) -> Result<Self, IntervalError> {
        let speaker = speaker.into();
        if speaker.is_empty() {
            return Err(IntervalError::EmptySpeaker);
        }
        Ok(Self { interval, speaker })
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn start(&self) -> f64 {
        self.interval.start
    }

    pub fn end(&self) -> f64 {
        self.interval.end
    }

    /// Output ordering: start time ascending, speaker label as tie-break.
    pub fn cmp_output_order(&self, other: &MatchedInterval) -> Ordering {
        self.interval
            .cmp_start(&other.interval)
            .then_with(|| self.speaker.cmp(&other.speaker))
    }
}

pub(crate) fn check_finite(value: f64) -> Result<(), IntervalError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(IntervalError::NonFinite(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_interval() {
        let iv = Interval::new(1.0, 2.5).unwrap();
        assert_eq!(iv.start(), 1.0);
        assert_eq!(iv.end(), 2.5);
        assert!((iv.duration() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_interval_rejected() {
        assert!(matches!(
            Interval::new(1.0, 1.0),
            Err(IntervalError::NotAfterStart { .. })
        ));
        assert!(matches!(
            Interval::new(2.0, 1.0),
            Err(IntervalError::NotAfterStart { .. })
        ));
    }

    #[test]
    fn test_negative_start_rejected() {
        assert!(matches!(
            Interval::new(-0.1, 1.0),
            Err(IntervalError::NegativeStart(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Interval::new(f64::NAN, 1.0).is_err());
        assert!(Interval::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_overlap_half_open() {
        let a = Interval::new(0.0, 1.0).unwrap();
        let b = Interval::new(1.0, 2.0).unwrap();
        let c = Interval::new(0.5, 1.5).unwrap();

        // Touching at the boundary is not an overlap
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_intersect_clips() {
        let g = Interval::new(2.0, 10.0).unwrap();
        let t = Interval::new(0.0, 5.0).unwrap();

        let sub = g.intersect(&t).unwrap();
        assert_eq!(sub.start(), 2.0);
        assert_eq!(sub.end(), 5.0);
    }

    #[test]
    fn test_intersect_boundary_touch_is_none() {
        let g = Interval::new(2.0, 10.0).unwrap();
        let t = Interval::new(10.0, 12.0).unwrap();
        assert!(g.intersect(&t).is_none());
    }

    #[test]
    fn test_empty_speaker_rejected() {
        assert!(matches!(
            LabeledInterval::new(0.0, 1.0, ""),
            Err(IntervalError::EmptySpeaker)
        ));
    }

    #[test]
    fn test_matched_output_order() {
        let a = MatchedInterval::new(Interval::new(1.0, 2.0).unwrap(), "SPEAKER_01").unwrap();
        let b = MatchedInterval::new(Interval::new(1.0, 3.0).unwrap(), "SPEAKER_00").unwrap();
        let c = MatchedInterval::new(Interval::new(0.5, 2.0).unwrap(), "SPEAKER_02").unwrap();

        // Start time dominates; speaker breaks ties
        assert_eq!(c.cmp_output_order(&a), Ordering::Less);
        assert_eq!(b.cmp_output_order(&a), Ordering::Less);
        assert_eq!(a.cmp_output_order(&a), Ordering::Equal);
    }
}
