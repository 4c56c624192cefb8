//! Run configuration

use crate::error::{GridError, Result};
use std::path::PathBuf;

/// Upper bound on grid cells; each cell costs one ffmpeg run per video.
pub const MAX_CELLS: u32 = 1024;

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub font_path: PathBuf,
    /// Video file extensions to pick up, matched case-insensitively
    pub extensions: Vec<String>,
    pub columns: u32,
    pub rows: u32,
    pub font_size: u32,
    pub jpeg_quality: u8, // ffmpeg -q:v, 2 (best) ..= 31
    pub caption_margin: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            input_dir: PathBuf::from("Input-Video"),
            output_dir: PathBuf::from("Output-Image"),
            font_path: PathBuf::from("NotoSansThai.ttf"),
            extensions: vec!["mp4".to_string()],
            columns: 4,
            rows: 4,
            font_size: 200,
            jpeg_quality: 2,
            caption_margin: 50,
        }
    }
}

impl GridConfig {
    /// Number of thumbnails per video, one per grid cell.
    pub fn sample_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(GridError::InvalidConfig(format!(
                "grid must have at least one cell, got {}x{}",
                self.columns, self.rows
            )));
        }
        match self.columns.checked_mul(self.rows) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(GridError::InvalidConfig(format!(
                    "grid {}x{} exceeds {} cells",
                    self.columns, self.rows, MAX_CELLS
                )));
            }
        }
        if !(2..=31).contains(&self.jpeg_quality) {
            return Err(GridError::InvalidConfig(format!(
                "jpeg quality must be within 2..=31, got {}",
                self.jpeg_quality
            )));
        }
        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err(GridError::InvalidConfig(
                "at least one video extension is required".to_string(),
            ));
        }
        Ok(())
    }
}
