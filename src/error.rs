use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Could not retrieve duration for video: {}", .0.display())]
    MissingDuration(PathBuf),

    #[error("Invalid duration {value:?} for video: {}", .path.display())]
    InvalidDuration { path: PathBuf, value: String },

    #[error("Cannot read input directory {}: {source}", .path.display())]
    InputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] crate::ffmpeg::FfmpegError),
}

impl GridError {
    /// True when the failure came from an external tool rather than from our own checks.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, GridError::Ffmpeg(_))
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
