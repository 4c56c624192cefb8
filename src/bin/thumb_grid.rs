// thumb_grid - batch contact-sheet generator
// Runs ffprobe/ffmpeg over every video in a folder and writes a captioned 4x4 grid per file

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thumb_grid::ffmpeg::is_installed;
use thumb_grid::{BatchDriver, GridConfig, SystemRunner};

#[derive(Parser)]
#[command(name = "thumb_grid", version, about = "Build captioned thumbnail grids from a folder of videos")]
struct Args {
    /// Directory scanned for videos
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory receiving thumbnails and grid images
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// ffmpeg binary
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// ffprobe binary
    #[arg(long)]
    ffprobe: Option<PathBuf>,

    /// Font file used for the caption
    #[arg(long)]
    font: Option<PathBuf>,

    /// Video extensions to pick up (repeatable)
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Grid columns
    #[arg(long)]
    columns: Option<u32>,

    /// Grid rows
    #[arg(long)]
    rows: Option<u32>,

    /// Caption font size
    #[arg(long)]
    font_size: Option<u32>,

    /// Caption distance from the bottom edge, in pixels
    #[arg(long)]
    caption_margin: Option<u32>,

    /// JPEG quality for extracted frames (ffmpeg -q:v, 2 is best)
    #[arg(long)]
    quality: Option<u8>,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> (GridConfig, Option<PathBuf>) {
        let mut config = GridConfig::default();
        if let Some(dir) = self.input_dir {
            config.input_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(path) = self.ffmpeg {
            config.ffmpeg_path = path;
        }
        if let Some(path) = self.ffprobe {
            config.ffprobe_path = path;
        }
        if let Some(path) = self.font {
            config.font_path = path;
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions;
        }
        config.columns = self.columns.unwrap_or(config.columns);
        config.rows = self.rows.unwrap_or(config.rows);
        config.font_size = self.font_size.unwrap_or(config.font_size);
        config.caption_margin = self.caption_margin.unwrap_or(config.caption_margin);
        config.jpeg_quality = self.quality.unwrap_or(config.jpeg_quality);
        (config, self.report)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the per-video status lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let (config, report_path) = Args::parse().into_config();

    info!("🎬 thumb_grid");
    info!("   Input:  {}", config.input_dir.display());
    info!("   Output: {}", config.output_dir.display());

    for tool in [&config.ffprobe_path, &config.ffmpeg_path] {
        if !is_installed(tool) {
            warn!("{} could not be started; every video will fail", tool.display());
        }
    }
    if !config.font_path.exists() {
        warn!("Font {} not found; ffmpeg may refuse to draw captions", config.font_path.display());
    }

    let runner = SystemRunner;
    let driver = BatchDriver::new(&config, &runner);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = driver.run(&mut out).context("Batch run failed")?;
    out.flush()?;

    if let Some(path) = report_path {
        let json = serde_json::to_vec_pretty(&report).context("Failed to serialize report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("   Report: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let (config, report) = Args::try_parse_from(["thumb_grid"]).unwrap().into_config();
        assert_eq!(config.input_dir, PathBuf::from("Input-Video"));
        assert_eq!(config.sample_count(), 16);
        assert!(report.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "thumb_grid",
            "--input-dir", "videos",
            "--ext", "mkv",
            "--ext", "mov",
            "--columns", "3",
            "--rows", "2",
            "--report", "run.json",
        ])
        .unwrap();
        let (config, report) = args.into_config();
        assert_eq!(config.input_dir, PathBuf::from("videos"));
        assert_eq!(config.extensions, vec!["mkv", "mov"]);
        assert_eq!(config.sample_count(), 6);
        assert_eq!(report, Some(PathBuf::from("run.json")));
    }
}
