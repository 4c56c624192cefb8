//! Thumbnail extraction via FFmpeg

use crate::config::GridConfig;
use crate::ffmpeg::{FfmpegCommand, FfmpegError, ToolRunner};
use crate::sampling::format_timestamp;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const THUMBNAIL_PREFIX: &str = "thumb_";
pub const THUMBNAIL_EXT: &str = "jpg";

/// 1-based, matching the image2 sequence the composite step reads.
pub fn thumbnail_path(dir: impl AsRef<Path>, index: usize) -> PathBuf {
    dir.as_ref()
        .join(format!("{}{}.{}", THUMBNAIL_PREFIX, index, THUMBNAIL_EXT))
}

/// image2 input pattern for the frames in `dir`.
///
/// `%` in the directory is doubled so only the trailing `%d` is a sequence field.
pub fn thumbnail_pattern(dir: impl AsRef<Path>) -> String {
    let dir = dir.as_ref().display().to_string().replace('%', "%%");
    PathBuf::from(dir)
        .join(format!("{}%d.{}", THUMBNAIL_PREFIX, THUMBNAIL_EXT))
        .display()
        .to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct Thumbnail {
    pub index: usize,
    pub timestamp: f64,
    pub path: PathBuf,
}

pub struct ThumbnailExtractor {
    ffmpeg: PathBuf,
    quality: u8,
}

impl ThumbnailExtractor {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg_path.clone(),
            quality: config.jpeg_quality,
        }
    }

    /// Grab the frame at `timestamp` into `output_dir/thumb_<index>.jpg`,
    /// overwriting any earlier frame of that name.
    pub fn extract_frame(
        &self,
        runner: &dyn ToolRunner,
        video: &Path,
        output_dir: &Path,
        index: usize,
        timestamp: f64,
    ) -> Result<Thumbnail, FfmpegError> {
        let path = thumbnail_path(output_dir, index);

        FfmpegCommand::new(&self.ffmpeg)
            .arg("-ss")
            .arg(format_timestamp(timestamp))
            .input(video)
            .args(&["-vframes", "1", "-q:v", &self.quality.to_string(), "-y"])
            .output(&path)
            .execute(runner)?;

        debug!("frame {} @ {:.3}s -> {}", index, timestamp, path.display());
        Ok(Thumbnail { index, timestamp, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Vec<String>>>,
        fail_at: Option<usize>,
    }

    impl ToolRunner for Recorder {
        fn run(&self, _program: &Path, args: &[String]) -> Result<String, FfmpegError> {
            let mut calls = self.calls.borrow_mut();
            calls.push(args.to_vec());
            if Some(calls.len()) == self.fail_at {
                return Err(FfmpegError::ExecutionFailed {
                    program: "ffmpeg".to_string(),
                    code: Some(1),
                    stderr: "decode error".to_string(),
                });
            }
            Ok(String::new())
        }
    }

    #[test]
    fn test_thumbnail_path_is_one_based() {
        assert_eq!(thumbnail_path("out/clip", 1), PathBuf::from("out/clip/thumb_1.jpg"));
        assert_eq!(thumbnail_path("out/clip", 16), PathBuf::from("out/clip/thumb_16.jpg"));
    }

    #[test]
    fn test_pattern_matches_thumbnail_names() {
        assert_eq!(thumbnail_pattern("out/clip"), "out/clip/thumb_%d.jpg");
        assert_eq!(
            thumbnail_pattern("out/clip").replace("%d", "7"),
            thumbnail_path("out/clip", 7).display().to_string()
        );
    }

    #[test]
    fn test_pattern_escapes_percent_in_dir() {
        assert_eq!(thumbnail_pattern("out/50%off"), "out/50%%off/thumb_%d.jpg");
    }

    #[test]
    fn test_extract_frame_arguments() {
        let runner = Recorder::default();
        let extractor = ThumbnailExtractor::new(&GridConfig::default());

        let thumb = extractor
            .extract_frame(&runner, Path::new("in/clip.mp4"), Path::new("out/clip"), 2, 2.5)
            .unwrap();

        assert_eq!(thumb.index, 2);
        assert_eq!(thumb.timestamp, 2.5);
        assert_eq!(thumb.path, PathBuf::from("out/clip/thumb_2.jpg"));

        let calls = runner.calls.borrow();
        assert_eq!(
            calls[0],
            ["-ss", "2.5", "-i", "in/clip.mp4", "-vframes", "1", "-q:v", "2", "-y", "out/clip/thumb_2.jpg"]
        );
    }

    #[test]
    fn test_extract_frame_propagates_failure() {
        let runner = Recorder { fail_at: Some(1), ..Recorder::default() };
        let extractor = ThumbnailExtractor::new(&GridConfig::default());

        let err = extractor
            .extract_frame(&runner, Path::new("clip.mp4"), Path::new("out"), 1, 0.0)
            .unwrap_err();

        assert!(matches!(err, FfmpegError::ExecutionFailed { .. }));
    }
}
