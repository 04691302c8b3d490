//! Timestamp formatting helpers for logs and file names.

/// Format seconds into an HH:MM:SS or HH:MM:SS.mmm string.
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    // Include milliseconds if present
    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}
