//! FFmpeg / FFprobe command wrapper utilities

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FfmpegError {
    #[error("{0} not found (is it installed and on PATH?)")]
    NotInstalled(String),

    #[error("{program} exited with status {}: {stderr}", exit_label(.code))]
    ExecutionFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Runs an external tool to completion and hands back its stdout.
pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<String, FfmpegError>;
}

/// Spawns real processes and blocks until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<String, FfmpegError> {
        let name = program.display().to_string();
        debug!("exec: {} {}", name, args.join(" "));

        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                FfmpegError::NotInstalled(name.clone())
            } else {
                FfmpegError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FfmpegError::ExecutionFailed {
                program: name,
                code: output.status.code(),
                stderr: last_line(&stderr).to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| FfmpegError::InvalidOutput(e.to_string()))
    }
}

/// ffmpeg prints its banner and progress to stderr; the cause sits on the last line.
fn last_line(stderr: &str) -> &str {
    stderr.trim().lines().last().unwrap_or("").trim()
}

pub struct FfmpegCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl FfmpegCommand {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.args.push("-i".to_string());
        self.args.push(path.as_ref().display().to_string());
        self
    }

    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        self.args.push(path.as_ref().display().to_string());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn execute(self, runner: &dyn ToolRunner) -> Result<String, FfmpegError> {
        runner.run(&self.program, &self.args)
    }
}

/// Preflight check: can `<program> -version` be spawned at all.
pub fn is_installed(program: impl AsRef<Path>) -> bool {
    Command::new(program.as_ref())
        .arg("-version")
        .output()
        .is_ok()
}
