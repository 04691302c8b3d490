//! Speaker attribution: intersect good segments against diarization turns.
//!
//! Every non-empty overlap between a good segment and a turn yields one
//! output record, clipped to the intersection and carrying the turn's
//! speaker. Overlapping outputs from different turns are preserved
//! independently; this is intentionally not a re-run of the merger.

use annot_models::{Interval, LabeledInterval, MatchedInterval};
use tracing::debug;

use crate::error::SegmentResult;

/// Attribute speakers to good segments by intersecting against turns.
///
/// One record per non-empty pairwise overlap: a segment may yield zero, one
/// or many records, and a turn may contribute to several segments. Output is
/// sorted by start time ascending, speaker ascending as a tie-break.
///
/// Internally the turns are swept in start order with an early exit once a
/// turn starts at or past the segment's end; output content and order are
/// identical to the naive quadratic search.
pub fn match_speakers(
    segments: &[Interval],
    turns: &[LabeledInterval],
) -> SegmentResult<Vec<MatchedInterval>> {
    let mut sorted_turns: Vec<&LabeledInterval> = turns.iter().collect();
    sorted_turns.sort_by(|a, b| a.interval().cmp_start(b.interval()));

    let mut matched = Vec::new();
    for segment in segments {
        for turn in &sorted_turns {
            if turn.start() >= segment.end() {
                break;
            }
            // A boundary-touching turn passes the start test above but
            // produces an empty intersection, which is discarded here
            if let Some(sub) = segment.intersect(turn.interval()) {
                matched.push(MatchedInterval::new(sub, turn.speaker())?);
            }
        }
    }

    matched.sort_by(|a, b| a.cmp_output_order(b));

    debug!(
        segments = segments.len(),
        turns = turns.len(),
        matched = matched.len(),
        "Attributed speakers to segments"
    );

    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn turn(start: f64, end: f64, speaker: &str) -> LabeledInterval {
        LabeledInterval::new(start, end, speaker).unwrap()
    }

    #[test]
    fn test_overlap_clipping() {
        let segments = [iv(2.0, 10.0)];
        let turns = [
            turn(0.0, 5.0, "A"),
            turn(5.0, 12.0, "B"),
            turn(10.0, 12.0, "C"),
        ];

        let out = match_speakers(&segments, &turns).unwrap();
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].start(), 2.0);
        assert_eq!(out[0].end(), 5.0);
        assert_eq!(out[0].speaker(), "A");

        assert_eq!(out[1].start(), 5.0);
        assert_eq!(out[1].end(), 10.0);
        assert_eq!(out[1].speaker(), "B");
    }

    #[test]
    fn test_turn_spanning_multiple_segments() {
        let segments = [iv(0.0, 2.0), iv(3.0, 5.0)];
        let turns = [turn(0.0, 10.0, "A")];

        let out = match_speakers(&segments, &turns).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].start(), out[0].end()), (0.0, 2.0));
        assert_eq!((out[1].start(), out[1].end()), (3.0, 5.0));
    }

    #[test]
    fn test_overlapping_turns_both_emitted() {
        // Simultaneous speakers produce overlapping output records; no
        // deduplication is performed
        let segments = [iv(0.0, 4.0)];
        let turns = [turn(0.0, 3.0, "A"), turn(1.0, 4.0, "B")];

        let out = match_speakers(&segments, &turns).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].speaker(), "A");
        assert_eq!(out[1].speaker(), "B");
    }

    #[test]
    fn test_output_sorted_by_start_then_speaker() {
        let segments = [iv(0.0, 10.0)];
        let turns = [turn(2.0, 4.0, "B"), turn(2.0, 3.0, "A"), turn(0.5, 1.0, "C")];

        let out = match_speakers(&segments, &turns).unwrap();
        let keys: Vec<(f64, &str)> = out.iter().map(|m| (m.start(), m.speaker())).collect();
        assert_eq!(keys, vec![(0.5, "C"), (2.0, "A"), (2.0, "B")]);
    }

    #[test]
    fn test_unsorted_turns_same_result() {
        let segments = [iv(2.0, 10.0)];
        let a = [turn(0.0, 5.0, "A"), turn(5.0, 12.0, "B")];
        let b = [turn(5.0, 12.0, "B"), turn(0.0, 5.0, "A")];

        assert_eq!(
            match_speakers(&segments, &a).unwrap(),
            match_speakers(&segments, &b).unwrap()
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_speakers(&[], &[turn(0.0, 1.0, "A")]).unwrap().is_empty());
        assert!(match_speakers(&[iv(0.0, 1.0)], &[]).unwrap().is_empty());
        assert!(match_speakers(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_no_overlap_yields_nothing() {
        let segments = [iv(0.0, 1.0)];
        let turns = [turn(1.0, 2.0, "A")];
        assert!(match_speakers(&segments, &turns).unwrap().is_empty());
    }
}
