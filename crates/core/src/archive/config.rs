//! Configuration for the archive module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the external extraction tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path to the 7z binary.
    #[serde(default = "default_tool_path")]
    pub tool_path: PathBuf,

    /// Where joined archives and extraction directories are created.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_tool_path() -> PathBuf {
    PathBuf::from("7z")
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            tool_path: default_tool_path(),
            temp_dir: default_temp_dir(),
        }
    }
}

impl ExtractorConfig {
    /// Sets the temp directory.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Sets the extraction tool path.
    pub fn with_tool_path(mut self, tool_path: PathBuf) -> Self {
        self.tool_path = tool_path;
        self
    }
}
