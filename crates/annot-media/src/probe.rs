//! FFprobe duration probing.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probe an audio file for its duration in seconds.
///
/// Extraction windows are clamped against this value so margins never reach
/// past the end of the recording.
pub async fn probe_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "FFprobe failed".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    parse_duration(&output.stdout)?.ok_or_else(|| MediaError::NoDuration(path.to_path_buf()))
}

/// Parse the duration out of ffprobe's JSON output.
///
/// Malformed JSON is an error; well-formed output without a parseable
/// duration field is `Ok(None)`.
fn parse_duration(stdout: &[u8]) -> Result<Option<f64>, serde_json::Error> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)?;
    Ok(probe.format.duration.as_ref().and_then(|d| d.parse::<f64>().ok()))
}
