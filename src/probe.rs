//! Duration lookup via ffprobe

use crate::error::{GridError, Result};
use crate::ffmpeg::{FfmpegCommand, ToolRunner};
use std::path::Path;
use tracing::debug;

/// Ask ffprobe for the container duration of `video`, in seconds.
pub fn probe_duration(runner: &dyn ToolRunner, ffprobe: &Path, video: &Path) -> Result<f64> {
    let stdout = FfmpegCommand::new(ffprobe)
        .args(&[
            "-v", "error",
            "-show_entries", "format=duration",
            "-of", "default=noprint_wrappers=1:nokey=1",
        ])
        .output(video)
        .execute(runner)?;

    let duration = parse_duration(&stdout, video)?;
    debug!("{}: duration {:.3}s", video.display(), duration);
    Ok(duration)
}

/// Parse the bare number ffprobe prints with `nokey=1`.
pub fn parse_duration(stdout: &str, video: &Path) -> Result<f64> {
    let text = stdout.trim();
    if text.is_empty() {
        return Err(GridError::MissingDuration(video.to_path_buf()));
    }

    let invalid = || GridError::InvalidDuration {
        path: video.to_path_buf(),
        value: text.to_string(),
    };

    let duration: f64 = text.parse().map_err(|_| invalid())?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(invalid());
    }
    Ok(duration)
}
