//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while planning or running a conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// The engine process could not be started.
    #[error("Failed to launch {program}: {source}")]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An engine pass exited unsuccessfully.
    #[error("Pass {pass} failed with exit code {code:?}")]
    PassFailed {
        pass: u8,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// Failed to probe a media file.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a pass failure, dropping blank stderr.
    pub fn pass_failed(pass: u8, code: Option<i32>, stderr: Option<String>) -> Self {
        Self::PassFailed {
            pass,
            code,
            stderr: stderr
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Creates a new probe failed error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    /// Maps a spawn error for the engine binary.
    pub fn ffmpeg_launch(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FfmpegNotFound { path }
        } else {
            Self::LaunchFailed {
                program: path,
                source,
            }
        }
    }

    /// Maps a spawn error for the probe binary.
    pub fn ffprobe_launch(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FfprobeNotFound { path }
        } else {
            Self::LaunchFailed {
                program: path,
                source,
            }
        }
    }

    /// The failing pass number, for engine failures.
    pub fn failed_pass(&self) -> Option<u8> {
        match self {
            Self::PassFailed { pass, .. } => Some(*pass),
            _ => None,
        }
    }
}
