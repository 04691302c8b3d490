//! Silence detection via FFmpeg's silencedetect filter.
//!
//! Runs the recording through `-af silencedetect` with a null sink and
//! parses the filter's stderr report into silence intervals. This keeps
//! silence detection in the external decoder, consistent with the rest of
//! the pipeline's orchestration-only stance.

use std::path::Path;

use annot_models::Interval;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Configuration for silence detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceConfig {
    /// Noise floor in dBFS; audio below this level counts as silence.
    pub noise_db: f64,
    /// Minimum silence duration in seconds before it is reported.
    pub min_silence: f64,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            noise_db: -40.0,
            min_silence: 0.5,
        }
    }
}

impl SilenceConfig {
    /// Builder-style setter for the noise floor.
    pub fn with_noise_db(mut self, noise_db: f64) -> Self {
        self.noise_db = noise_db;
        self
    }

    /// Builder-style setter for the minimum silence duration.
    pub fn with_min_silence(mut self, min_silence: f64) -> Self {
        self.min_silence = min_silence;
        self
    }

    /// The silencedetect filter expression.
    fn filter_expr(&self) -> String {
        format!(
            "silencedetect=noise={}dB:d={}",
            self.noise_db, self.min_silence
        )
    }

    fn validate(&self) -> MediaResult<()> {
        if !self.min_silence.is_finite() || self.min_silence < 0.0 {
            return Err(MediaError::invalid_parameter(format!(
                "min_silence must be finite and >= 0 (got {})",
                self.min_silence
            )));
        }
        if !self.noise_db.is_finite() {
            return Err(MediaError::invalid_parameter(format!(
                "noise_db must be finite (got {})",
                self.noise_db
            )));
        }
        Ok(())
    }
}

/// Detect silence regions in a recording.
///
/// Returns the silence intervals in time order. A silence still open when
/// the stream ends (no matching `silence_end` line) is dropped.
pub async fn detect_silence(
    input: impl AsRef<Path>,
    config: &SilenceConfig,
) -> MediaResult<Vec<Interval>> {
    let input = input.as_ref();
    config.validate()?;

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    // silencedetect reports on stderr at info level, so raise the log level
    // and discard the decoded output into a null sink
    let cmd = FfmpegCommand::new(input, "-")
        .log_level("info")
        .no_video()
        .audio_filter(config.filter_expr())
        .format("null");

    let output = FfmpegRunner::new().capture(&cmd).await?;
    if !output.status.success() {
        return Err(MediaError::ffmpeg_failed(
            "FFmpeg silencedetect failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
            output.status.code(),
        ));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let silences = parse_silencedetect(&stderr)?;

    debug!(
        input = %input.display(),
        silences = silences.len(),
        noise_db = config.noise_db,
        min_silence = config.min_silence,
        "Silence detection complete"
    );

    Ok(silences)
}

/// Parse silencedetect's stderr report.
///
/// The filter emits lines of the form:
/// ```text
/// [silencedetect @ 0x...] silence_start: 12.34
/// [silencedetect @ 0x...] silence_end: 15.6 | silence_duration: 3.26
/// ```
fn parse_silencedetect(stderr: &str) -> MediaResult<Vec<Interval>> {
    let mut silences = Vec::new();
    let mut open_start: Option<f64> = None;

    for line in stderr.lines() {
        if let Some(value) = field_value(line, "silence_start:") {
            // ffmpeg can report a tiny negative start at the head of a stream
            let start = parse_field(value)?.max(0.0);
            open_start = Some(start);
        } else if let Some(value) = field_value(line, "silence_end:") {
            let end = parse_field(value)?;
            if let Some(start) = open_start.take() {
                if end > start {
                    // Silence bounds come from ffmpeg, already non-negative
                    // and ordered after the clamp above
                    silences.push(
                        Interval::new(start, end)
                            .map_err(|e| MediaError::SilenceParse(e.to_string()))?,
                    );
                }
            }
        }
    }

    Ok(silences)
}

/// Extract the numeric token following `field` in a silencedetect line.
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.split(field).nth(1)?;
    let token = rest.split_whitespace().next()?;
    Some(token)
}

fn parse_field(token: &str) -> MediaResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| MediaError::SilenceParse(format!("not a number: '{token}'")))
}
