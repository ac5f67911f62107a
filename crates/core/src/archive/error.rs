//! Error types for the archive module.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reassembling or extracting archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Joining split fragments failed. `path` is the fragment the caller asked for.
    #[error("Failed to reassemble {path}")]
    Reassembly {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two fragments of the same group carry the same sequence number.
    #[error("Duplicate part {index} in archive group '{group_key}': {first} and {second}")]
    DuplicatePart {
        path: PathBuf,
        group_key: String,
        index: u32,
        first: String,
        second: String,
    },

    /// Extraction tool binary not found.
    #[error("Extraction tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// Extraction tool exited unsuccessfully.
    #[error("Extraction of {archive} failed with code {code:?}")]
    ExtractionFailed {
        archive: PathBuf,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// Temporary directory could not be created.
    #[error("Failed to create temporary directory in {path}")]
    TempDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Creates a reassembly error for the fragment at `path`.
    pub fn reassembly(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Reassembly {
            path: path.into(),
            source,
        }
    }

    /// The path the caller originally handed in, when the error carries one.
    ///
    /// Reassembly failures keep it so the caller can still try the fragment
    /// directly.
    pub fn original_path(&self) -> Option<&Path> {
        match self {
            Self::Reassembly { path, .. } | Self::DuplicatePart { path, .. } => Some(path),
            _ => None,
        }
    }
}
