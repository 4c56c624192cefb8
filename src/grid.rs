//! Contact-sheet composition: tile the thumbnails and burn in a caption

use crate::config::GridConfig;
use crate::ffmpeg::{FfmpegCommand, FfmpegError, ToolRunner};
use crate::video::thumbnail_pattern;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct GridImage {
    pub path: PathBuf,
    /// `None` when the written file could not be decoded
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub fn grid_path(output_dir: impl AsRef<Path>, video_name: &str) -> PathBuf {
    output_dir.as_ref().join(format!("{}_grid.jpg", video_name))
}

pub struct GridComposer {
    ffmpeg: PathBuf,
    font_path: PathBuf,
    columns: u32,
    rows: u32,
    font_size: u32,
    caption_margin: u32,
}

impl GridComposer {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg_path.clone(),
            font_path: config.font_path.clone(),
            columns: config.columns,
            rows: config.rows,
            font_size: config.font_size,
            caption_margin: config.caption_margin,
        }
    }

    /// Filter graph for the tile + drawtext pass.
    pub fn filter_graph(&self, caption: &str) -> String {
        format!(
            "tile={}x{},drawtext=text={}:x=(w-text_w)/2:y=h-th-{}:fontsize={}:fontcolor=white:box=1:boxcolor=black@0.5:fontfile={}:expansion=none",
            self.columns,
            self.rows,
            escape_filter_value(caption),
            self.caption_margin,
            self.font_size,
            escape_filter_value(&self.font_path.display().to_string()),
        )
    }

    /// Read `thumb_dir/thumb_N.jpg` in order and write `output`.
    pub fn compose(
        &self,
        runner: &dyn ToolRunner,
        thumb_dir: &Path,
        caption: &str,
        output: &Path,
    ) -> Result<GridImage, FfmpegError> {
        FfmpegCommand::new(&self.ffmpeg)
            .args(&["-start_number", "1"])
            .arg("-i")
            .arg(thumbnail_pattern(thumb_dir))
            .arg("-filter_complex")
            .arg(self.filter_graph(caption))
            .args(&["-frames:v", "1", "-update", "1", "-y"])
            .output(output)
            .execute(runner)?;

        let (width, height) = match image::image_dimensions(output) {
            Ok((w, h)) => (Some(w), Some(h)),
            Err(e) => {
                debug!("could not read back {}: {}", output.display(), e);
                (None, None)
            }
        };

        Ok(GridImage {
            path: output.to_path_buf(),
            width,
            height,
        })
    }
}

/// Escape a drawtext option value for both parsing passes ffmpeg makes.
///
/// The option parser sees `'...'` quoting (a literal `'` becomes `'\''`); the
/// filtergraph parser runs first and needs `\` before `' \ [ ] , ;`.
pub fn escape_filter_value(value: &str) -> String {
    let quoted = format!("'{}'", value.replace('\'', r"'\''"));

    let mut escaped = String::with_capacity(quoted.len() * 2);
    for ch in quoted.chars() {
        if matches!(ch, '\'' | '\\' | '[' | ']' | ',' | ';') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
