//! Uniform sample timestamps

/// `count` timestamps at `i * duration / count`, starting at zero.
///
/// The last sample lands at `(count - 1) / count` of the duration, so the final
/// stretch of the video is never sampled.
pub fn sample_timestamps(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let interval = duration / count as f64;
    (0..count).map(|i| i as f64 * interval).collect()
}

/// Seconds as passed to `-ss`.
pub fn format_timestamp(seconds: f64) -> String {
    seconds.to_string()
}
