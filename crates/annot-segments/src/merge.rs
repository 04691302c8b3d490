//! Interval merging: coalesce near-adjacent intervals, drop short runs.
//!
//! A classic sweep-line merge with a tolerance band: `max_gap` effectively
//! dilates every interval before the overlap test. Sorting by start time
//! first makes the result independent of input order, and the explicit
//! open-run accumulator keeps the two-state machine (open run / no run)
//! testable in isolation.

use annot_models::Interval;
use tracing::debug;

use crate::error::{SegmentError, SegmentResult};

/// Default gap tolerance in seconds.
pub const DEFAULT_MAX_GAP: f64 = 0.4;

/// Configuration for the merge pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeConfig {
    /// Maximum allowed distance between the end of the current run and the
    /// start of the next interval for them to be merged. `0.0` merges only
    /// truly touching or overlapping intervals.
    pub max_gap: f64,

    /// Runs strictly shorter than this are dropped after merging. A run of
    /// length exactly `min_duration` is retained. `0.0` performs no
    /// filtering.
    pub min_duration: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_gap: DEFAULT_MAX_GAP,
            min_duration: 0.0,
        }
    }
}

impl MergeConfig {
    /// Builder-style setter for the gap tolerance.
    pub fn with_max_gap(mut self, max_gap: f64) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Builder-style setter for the minimum run duration.
    pub fn with_min_duration(mut self, min_duration: f64) -> Self {
        self.min_duration = min_duration;
        self
    }

    /// Check that both parameters are finite and non-negative.
    pub fn validate(&self) -> SegmentResult<()> {
        if !self.max_gap.is_finite() || self.max_gap < 0.0 {
            return Err(SegmentError::invalid_parameter(format!(
                "max_gap must be finite and >= 0 (got {})",
                self.max_gap
            )));
        }
        if !self.min_duration.is_finite() || self.min_duration < 0.0 {
            return Err(SegmentError::invalid_parameter(format!(
                "min_duration must be finite and >= 0 (got {})",
                self.min_duration
            )));
        }
        Ok(())
    }
}

/// The open run carried through the merge fold.
#[derive(Debug, Clone, Copy)]
struct OpenRun {
    start: f64,
    end: f64,
}

impl OpenRun {
    fn from_interval(interval: &Interval) -> Self {
        Self {
            start: interval.start(),
            end: interval.end(),
        }
    }

    /// Whether `interval` falls within the gap tolerance of this run.
    ///
    /// The test is against the running (extended) end, not the end of the
    /// interval that opened the run.
    fn absorbs(&self, interval: &Interval, max_gap: f64) -> bool {
        interval.start() <= self.end + max_gap
    }

    /// Extend the run. The run never shrinks: an interval nested entirely
    /// within it leaves the end unchanged.
    fn extend(&mut self, interval: &Interval) {
        self.end = self.end.max(interval.end());
    }

    fn close(self) -> Result<Interval, annot_models::IntervalError> {
        Interval::new(self.start, self.end)
    }
}

/// Merge intervals within `max_gap` of each other into maximal runs, then
/// drop runs shorter than `min_duration`.
///
/// The input may be unsorted; it is sorted by start time (stable) before
/// merging, so identical input sets always yield identical output regardless
/// of input order. Empty input yields empty output.
pub fn merge_intervals(
    intervals: &[Interval],
    config: &MergeConfig,
) -> SegmentResult<Vec<Interval>> {
    config.validate()?;

    if intervals.is_empty() {
        return Ok(Vec::new());
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by(|a, b| a.cmp_start(b));

    let mut merged: Vec<Interval> = Vec::new();
    let mut run = OpenRun::from_interval(&sorted[0]);

    for interval in &sorted[1..] {
        if run.absorbs(interval, config.max_gap) {
            run.extend(interval);
        } else {
            merged.push(run.close()?);
            run = OpenRun::from_interval(interval);
        }
    }
    merged.push(run.close()?);

    let before_filter = merged.len();
    merged.retain(|interval| interval.duration() >= config.min_duration);

    debug!(
        input = intervals.len(),
        runs = before_filter,
        kept = merged.len(),
        max_gap = config.max_gap,
        min_duration = config.min_duration,
        "Merged intervals"
    );

    Ok(merged)
}
