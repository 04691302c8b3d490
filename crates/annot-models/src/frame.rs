//! Per-frame classification scores from the upstream audio model.

use serde::{Deserialize, Serialize};

use crate::interval::{check_finite, Interval, IntervalError};

/// One frame of the scored-frames table: a time span plus the model's music
/// and speech probabilities for it.
///
/// Frames are produced externally as a time-ascending sequence and are
/// read-only input to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredFrame {
    span: Interval,
    music_prob: f64,
    speech_prob: f64,
}

impl ScoredFrame {
    /// Create a validated frame.
    ///
    /// # Errors
    /// Returns an error if the time span violates the interval invariants or
    /// either probability falls outside `[0, 1]`.
    pub fn new(
        start_time: f64,
        end_time: f64,
        music_prob: f64,
        speech_prob: f64,
    ) -> Result<Self, IntervalError> {
        let span = Interval::new(start_time, end_time)?;
        check_probability(music_prob)?;
        check_probability(speech_prob)?;
        Ok(Self {
            span,
            music_prob,
            speech_prob,
        })
    }

    pub fn start_time(&self) -> f64 {
        self.span.start()
    }

    pub fn end_time(&self) -> f64 {
        self.span.end()
    }

    pub fn music_prob(&self) -> f64 {
        self.music_prob
    }

    pub fn speech_prob(&self) -> f64 {
        self.speech_prob
    }

    /// The frame's own time span as a raw interval.
    pub fn interval(&self) -> Interval {
        self.span
    }
}

fn check_probability(value: f64) -> Result<(), IntervalError> {
    check_finite(value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(IntervalError::ProbabilityOutOfRange(value));
    }
    Ok(())
}
