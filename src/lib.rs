//! thumb_grid - 4x4 contact sheets for a folder of videos
//!
//! Every media operation shells out to the system `ffprobe` / `ffmpeg`
//! binaries; this crate only plans the invocations and lays out the files.

pub mod batch;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod grid;
pub mod metrics;
pub mod probe;
pub mod sampling;
pub mod video;

pub use batch::{discover_videos, video_name, BatchDriver, BatchReport, VideoOutcome};
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use ffmpeg::{FfmpegCommand, FfmpegError, SystemRunner, ToolRunner};
pub use grid::{GridComposer, GridImage};
pub use video::{Thumbnail, ThumbnailExtractor};
