//! CSV table I/O for the pipeline boundary.
//!
//! Column names are a contract shared with the external collaborators
//! (classification model, diarization model, extraction tooling):
//!
//! | Table | Columns |
//! |---|---|
//! | Scored frames | `start_time_s, end_time_s, music_prob, speech_prob` |
//! | Segments | `start_time, end_time` |
//! | Diarization turns | `start, stop, speaker` |
//! | Matched segments | `start_time, end_time, speaker` |
//!
//! Reads are fail-fast on malformed rows by default; writes go through a
//! temp file in the destination directory and are persisted atomically, so
//! a failed run never leaves a partial output table.

use std::path::Path;

use annot_models::{Interval, IntervalError, LabeledInterval, MatchedInterval, ScoredFrame};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{SegmentError, SegmentResult};

/// What to do with a row that fails schema or invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Abort the whole read on the first bad row (default). Skipping rows
    /// silently would corrupt downstream speaker attribution.
    #[default]
    Fail,
    /// Log and drop bad rows, keep the rest.
    Skip,
}

#[derive(Debug, Deserialize)]
struct ScoredFrameRow {
    start_time_s: f64,
    end_time_s: f64,
    music_prob: f64,
    speech_prob: f64,
}

#[derive(Debug, Deserialize)]
struct SegmentRow {
    start_time: f64,
    end_time: f64,
}

#[derive(Debug, Deserialize)]
struct TurnRow {
    start: f64,
    stop: f64,
    speaker: String,
}

#[derive(Debug, Deserialize)]
struct MatchedRow {
    start_time: f64,
    end_time: f64,
    speaker: String,
}

/// Read the scored-frames table produced by the classification model.
pub fn read_scored_frames(
    path: impl AsRef<Path>,
    policy: MalformedPolicy,
) -> SegmentResult<Vec<ScoredFrame>> {
    read_table(path.as_ref(), policy, |row: ScoredFrameRow| {
        ScoredFrame::new(row.start_time_s, row.end_time_s, row.music_prob, row.speech_prob)
    })
}

/// Read a plain segments table (`start_time, end_time`).
pub fn read_segments(
    path: impl AsRef<Path>,
    policy: MalformedPolicy,
) -> SegmentResult<Vec<Interval>> {
    read_table(path.as_ref(), policy, |row: SegmentRow| {
        Interval::new(row.start_time, row.end_time)
    })
}

/// Read the diarization-turns table (`start, stop, speaker`).
pub fn read_turns(
    path: impl AsRef<Path>,
    policy: MalformedPolicy,
) -> SegmentResult<Vec<LabeledInterval>> {
    read_table(path.as_ref(), policy, |row: TurnRow| {
        LabeledInterval::new(row.start, row.stop, row.speaker)
    })
}

/// Read a matched-segments table (`start_time, end_time, speaker`) back in,
/// e.g. for labeled extraction.
pub fn read_matched_segments(
    path: impl AsRef<Path>,
    policy: MalformedPolicy,
) -> SegmentResult<Vec<MatchedInterval>> {
    read_table(path.as_ref(), policy, |row: MatchedRow| {
        let interval = Interval::new(row.start_time, row.end_time)?;
        MatchedInterval::new(interval, row.speaker)
    })
}

/// Write a segments table atomically.
pub fn write_segments(path: impl AsRef<Path>, segments: &[Interval]) -> SegmentResult<()> {
    write_table(
        path.as_ref(),
        &["start_time", "end_time"],
        segments.iter().map(|iv| (iv.start(), iv.end())),
    )
}

/// Write a matched-segments table atomically.
pub fn write_matched_segments(
    path: impl AsRef<Path>,
    matched: &[MatchedInterval],
) -> SegmentResult<()> {
    write_table(
        path.as_ref(),
        &["start_time", "end_time", "speaker"],
        matched.iter().map(|m| (m.start(), m.end(), m.speaker().to_string())),
    )
}

fn read_table<Row, T, F>(path: &Path, policy: MalformedPolicy, convert: F) -> SegmentResult<Vec<T>>
where
    Row: DeserializeOwned,
    F: Fn(Row) -> Result<T, IntervalError>,
{
    if !path.exists() {
        return Err(SegmentError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        // 1-based file line; the header is line 1
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: Row = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                reject_or_skip(policy, line, e.to_string())?;
                continue;
            }
        };

        match convert(row) {
            Ok(value) => out.push(value),
            Err(e) => reject_or_skip(policy, line, e.to_string())?,
        }
    }

    debug!(path = %path.display(), rows = out.len(), "Read table");
    Ok(out)
}

/// Fail-fast or log-and-drop, per policy.
fn reject_or_skip(policy: MalformedPolicy, line: u64, message: String) -> SegmentResult<()> {
    match policy {
        MalformedPolicy::Fail => Err(SegmentError::malformed(line, message)),
        MalformedPolicy::Skip => {
            warn!(row = line, error = %message, "Skipping malformed row");
            Ok(())
        }
    }
}

/// Serialize rows to a temp file next to `path`, then persist atomically.
///
/// The header is written explicitly so that an empty table still carries its
/// column contract.
fn write_table<Row>(
    path: &Path,
    header: &[&str],
    rows: impl Iterator<Item = Row>,
) -> SegmentResult<()>
where
    Row: serde::Serialize,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file());
        writer.write_record(header)?;

        let mut count = 0usize;
        for row in rows {
            writer.serialize(row)?;
            count += 1;
        }
        writer.flush()?;

        debug!(path = %path.display(), rows = count, "Wrote table");
    }

    tmp.persist(path).map_err(|e| SegmentError::Io(e.error))?;
    Ok(())
}
