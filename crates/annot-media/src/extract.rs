//! Audio segment extraction via FFmpeg stream copy.
//!
//! Cuts the intervals of a segments table out of the source recording, each
//! into its own file, with optional margins before and after the interval.
//! Windows are clamped to `[0, duration]` so margins never reach outside the
//! recording.

use std::path::{Path, PathBuf};

use annot_models::{format_seconds, Interval, MatchedInterval};
use tokio::fs;
use tracing::{info, warn};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_duration;

/// Margins applied around every extracted interval.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtractConfig {
    /// Seconds to include before each interval's start.
    pub before: f64,
    /// Seconds to include after each interval's end.
    pub after: f64,
}

impl ExtractConfig {
    /// Builder-style setter for the leading margin.
    pub fn with_before(mut self, before: f64) -> Self {
        self.before = before;
        self
    }

    /// Builder-style setter for the trailing margin.
    pub fn with_after(mut self, after: f64) -> Self {
        self.after = after;
        self
    }

    /// Check that both margins are finite and non-negative.
    pub fn validate(&self) -> MediaResult<()> {
        for (name, value) in [("before", self.before), ("after", self.after)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MediaError::invalid_parameter(format!(
                    "{name} margin must be finite and >= 0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// Extract each interval to `{stem}_{label}_{NNN}.wav` in `out_dir`.
///
/// Returns the written file paths in interval order. Intervals whose clamped
/// window is empty (entirely past the end of the recording) are skipped with
/// a warning.
pub async fn extract_segments(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    segments: &[Interval],
    label: &str,
    config: &ExtractConfig,
) -> MediaResult<Vec<PathBuf>> {
    let labels = vec![label.to_string(); segments.len()];
    extract_windows(input.as_ref(), out_dir.as_ref(), segments, &labels, config).await
}

/// Extract each matched interval, labeling files with the turn's speaker.
pub async fn extract_matched_segments(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    matched: &[MatchedInterval],
    config: &ExtractConfig,
) -> MediaResult<Vec<PathBuf>> {
    let intervals: Vec<Interval> = matched.iter().map(|m| *m.interval()).collect();
    let labels: Vec<String> = matched.iter().map(|m| sanitize_label(m.speaker())).collect();
    extract_windows(input.as_ref(), out_dir.as_ref(), &intervals, &labels, config).await
}

async fn extract_windows(
    input: &Path,
    out_dir: &Path,
    intervals: &[Interval],
    labels: &[String],
    config: &ExtractConfig,
) -> MediaResult<Vec<PathBuf>> {
    config.validate()?;

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let duration = probe_duration(input).await?;
    fs::create_dir_all(out_dir).await?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());

    let mut written = Vec::new();
    let runner = FfmpegRunner::new();

    for (counter, (interval, label)) in intervals.iter().zip(labels).enumerate() {
        let Some((start, end)) = clamp_window(interval, config, duration) else {
            warn!(
                start = interval.start(),
                end = interval.end(),
                duration,
                "Segment lies outside the recording, skipping"
            );
            continue;
        };

        let output = out_dir.join(format!("{stem}_{label}_{counter:03}.wav"));

        let cmd = FfmpegCommand::new(input, &output)
            .seek(start)
            .duration(end - start)
            .codec_copy();
        runner.run(&cmd).await?;

        info!(
            output = %output.display(),
            window = format!("{} - {}", format_seconds(start), format_seconds(end)),
            "Extracted segment"
        );
        written.push(output);
    }

    Ok(written)
}

/// Apply margins to an interval and clamp the window to the recording.
///
/// Returns `None` when nothing of the widened window lies inside
/// `[0, duration]`.
fn clamp_window(interval: &Interval, config: &ExtractConfig, duration: f64) -> Option<(f64, f64)> {
    let start = (interval.start() - config.before).max(0.0);
    let end = (interval.end() + config.after).min(duration);
    if end > start {
        Some((start, end))
    } else {
        None
    }
}

/// Make a speaker label safe for use in a file name.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
