//! Configuration for the processor module.

use std::path::PathBuf;

use crate::config::Config;

/// Settings the processor needs from the loaded configuration.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Profile used when a request does not name a known one.
    pub default_profile: String,

    /// Where outputs are written; the working directory when unset.
    pub output_dir: Option<PathBuf>,

    /// Whether to draw the spinner while passes run.
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            default_profile: "telegram".to_string(),
            output_dir: None,
            show_progress: true,
        }
    }
}

impl From<&Config> for ProcessorConfig {
    fn from(config: &Config) -> Self {
        Self {
            default_profile: config.mediacraft.default_profile.clone(),
            output_dir: config.mediacraft.output_dir.clone(),
            show_progress: true,
        }
    }
}

impl ProcessorConfig {
    /// Sets the output directory.
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    /// Sets whether the spinner is drawn.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}
