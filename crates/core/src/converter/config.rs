//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the FFmpeg-based engine and pass planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Hardware acceleration passed to `-hwaccel`. Empty disables it.
    #[serde(default = "default_hwaccel")]
    pub hwaccel: String,

    /// Whether the final pass may overwrite an existing output.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,

    /// Output target for analysis passes.
    #[serde(default = "default_null_sink")]
    pub null_sink: PathBuf,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_hwaccel() -> String {
    "cuda".to_string()
}

fn default_overwrite() -> bool {
    true
}

fn default_null_sink() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("NUL")
    } else {
        PathBuf::from("/dev/null")
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            hwaccel: default_hwaccel(),
            overwrite: default_overwrite(),
            null_sink: default_null_sink(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with custom ffmpeg/ffprobe paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            ..Default::default()
        }
    }

    /// Sets the hardware acceleration method.
    pub fn with_hwaccel(mut self, hwaccel: impl Into<String>) -> Self {
        self.hwaccel = hwaccel.into();
        self
    }

    /// Sets whether outputs are overwritten.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The acceleration method, if enabled.
    pub fn hwaccel(&self) -> Option<&str> {
        let accel = self.hwaccel.trim();
        (!accel.is_empty()).then_some(accel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.hwaccel(), Some("cuda"));
        assert!(config.overwrite);
        #[cfg(unix)]
        assert_eq!(config.null_sink, PathBuf::from("/dev/null"));
    }

    #[test]
    fn test_config_builder() {
        let config = ConverterConfig::with_paths(
            PathBuf::from("/usr/local/bin/ffmpeg"),
            PathBuf::from("/usr/local/bin/ffprobe"),
        )
        .with_hwaccel("")
        .with_overwrite(false);

        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.hwaccel(), None);
        assert!(!config.overwrite);
    }

    #[test]
    fn test_partial_toml() {
        let config: ConverterConfig = toml::from_str("hwaccel = \"vaapi\"").unwrap();
        assert_eq!(config.hwaccel(), Some("vaapi"));
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert!(config.overwrite);
    }
}
