//! Batch driver: one contact sheet per video in the input directory
//!
//! Videos are processed strictly one after another (probe, N extractions,
//! one composite). A failure on one video is printed and counted, then the
//! loop moves on to the next file.

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::ffmpeg::ToolRunner;
use crate::grid::{grid_path, GridComposer, GridImage};
use crate::metrics::{Invocation, Metrics, MetricsSnapshot, Timer};
use crate::probe::probe_duration;
use crate::sampling::sample_timestamps;
use crate::video::{Thumbnail, ThumbnailExtractor};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Regular files in `input_dir` (not recursive) with one of `extensions`, sorted by path.
pub fn discover_videos(input_dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|source| GridError::InputDir {
        path: input_dir.to_path_buf(),
        source,
    })?;

    let mut videos = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() && !path.is_file() {
            continue;
        }
        if has_extension(&path, extensions) {
            videos.push(path);
        }
    }

    videos.sort();
    Ok(videos)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Base name used for the thumbnail folder, the grid filename and the caption.
pub fn video_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoOutcome {
    pub name: String,
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub timestamps: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl VideoOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub videos: Vec<VideoOutcome>,
    pub metrics: MetricsSnapshot,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.videos.iter().filter(|v| !v.succeeded()).count()
    }
}

/// Everything produced for one successfully processed video.
struct Processed {
    duration: f64,
    thumbnails: Vec<Thumbnail>,
    grid: GridImage,
}

pub struct BatchDriver<'a> {
    config: &'a GridConfig,
    runner: &'a dyn ToolRunner,
    extractor: ThumbnailExtractor,
    composer: GridComposer,
    metrics: Metrics,
}

impl<'a> BatchDriver<'a> {
    pub fn new(config: &'a GridConfig, runner: &'a dyn ToolRunner) -> Self {
        Self {
            config,
            runner,
            extractor: ThumbnailExtractor::new(config),
            composer: GridComposer::new(config),
            metrics: Metrics::new(),
        }
    }

    /// Process every discovered video, writing one status line per video to `out`.
    ///
    /// Only setup problems (bad config, unreadable input directory, output
    /// directory not creatable, `out` not writable) end the run early.
    pub fn run(&self, out: &mut dyn Write) -> Result<BatchReport> {
        self.config.validate()?;
        let started_at = chrono::Utc::now().to_rfc3339();

        let videos = discover_videos(&self.config.input_dir, &self.config.extensions)?;
        fs::create_dir_all(&self.config.output_dir)?;
        info!(
            "Found {} video(s) in {}",
            videos.len(),
            self.config.input_dir.display()
        );

        let mut outcomes = Vec::with_capacity(videos.len());
        for video in &videos {
            outcomes.push(self.process(video, out)?);
        }

        let metrics = self.metrics.snapshot();
        info!(
            "Done: {} succeeded, {} failed",
            metrics.videos_succeeded, metrics.videos_failed
        );

        Ok(BatchReport {
            started_at,
            input_dir: self.config.input_dir.clone(),
            output_dir: self.config.output_dir.clone(),
            videos: outcomes,
            metrics,
        })
    }

    fn process(&self, video: &Path, out: &mut dyn Write) -> Result<VideoOutcome> {
        let timer = Timer::new();
        let name = video_name(video);
        let mut outcome = VideoOutcome {
            name: name.clone(),
            source: video.to_path_buf(),
            duration: None,
            timestamps: Vec::new(),
            grid: None,
            error: None,
            latency_ms: 0,
        };

        match self.process_video(video, &name) {
            Ok(done) => {
                writeln!(
                    out,
                    "Created thumbnail grid image for {}: {}",
                    name,
                    done.grid.path.display()
                )?;
                info!("✓ {} ({} frames, {:.2}s)", name, done.thumbnails.len(), done.duration);
                outcome.duration = Some(done.duration);
                outcome.timestamps = done.thumbnails.iter().map(|t| t.timestamp).collect();
                outcome.grid = Some(done.grid);
            }
            Err(e) => {
                if e.is_tool_failure() {
                    writeln!(
                        out,
                        "An error occurred while running FFmpeg on {}: {}",
                        video.display(),
                        e
                    )?;
                } else {
                    writeln!(out, "Error processing {}: {}", video.display(), e)?;
                }
                error!("✗ {}: {}", video.display(), e);
                outcome.error = Some(e.to_string());
            }
        }

        outcome.latency_ms = timer.elapsed_ms();
        self.metrics.record_video(outcome.succeeded(), outcome.latency_ms);
        Ok(outcome)
    }

    fn process_video(&self, video: &Path, name: &str) -> Result<Processed> {
        let thumb_dir = self.config.output_dir.join(name);
        fs::create_dir_all(&thumb_dir)?;

        self.metrics.record_invocation(Invocation::Probe, 1);
        let duration = probe_duration(self.runner, &self.config.ffprobe_path, video)?;

        let timestamps = sample_timestamps(duration, self.config.sample_count());
        let mut thumbnails = Vec::with_capacity(timestamps.len());
        for (i, &timestamp) in timestamps.iter().enumerate() {
            self.metrics.record_invocation(Invocation::Extract, 1);
            let thumb = self
                .extractor
                .extract_frame(self.runner, video, &thumb_dir, i + 1, timestamp)?;
            thumbnails.push(thumb);
        }

        let output = grid_path(&self.config.output_dir, name);
        self.metrics.record_invocation(Invocation::Composite, 1);
        let grid = self.composer.compose(self.runner, &thumb_dir, name, &output)?;
        debug!("{} -> {}", video.display(), grid.path.display());

        Ok(Processed {
            duration,
            thumbnails,
            grid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_name_strips_extension() {
        assert_eq!(video_name(Path::new("Input-Video/clip.mp4")), "clip");
        assert_eq!(video_name(Path::new("Input-Video/my.holiday.mp4")), "my.holiday");
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let exts = vec!["mp4".to_string(), ".mkv".to_string()];
        assert!(has_extension(Path::new("a.mp4"), &exts));
        assert!(has_extension(Path::new("a.MP4"), &exts));
        assert!(has_extension(Path::new("a.mkv"), &exts));
        assert!(!has_extension(Path::new("a.mov"), &exts));
        assert!(!has_extension(Path::new("mp4"), &exts));
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp4", "a.mp4", "notes.txt", "c.MP4"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.mp4")).unwrap();

        let found = discover_videos(dir.path(), &["mp4".to_string()]).unwrap();
        let names: Vec<_> = found.iter().map(|p| video_name(p)).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let err = discover_videos(Path::new("/nonexistent/Input-Video"), &["mp4".to_string()])
            .unwrap_err();
        assert!(matches!(err, GridError::InputDir { .. }));
    }
}
