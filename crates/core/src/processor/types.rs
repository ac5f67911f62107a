//! Types for the processor module.

use std::path::{Path, PathBuf};

use crate::converter::{format_duration, ConversionResult};
use crate::profile::ProfileResolver;

/// File extensions converted when a directory or archive is given.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "webm", "ts", "m2ts", "m4v", "flv", "mpg", "mpeg",
];

/// A parsed `path[@profile]` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub profile: String,
}

impl ConversionRequest {
    /// Parses a request.
    ///
    /// The text after the last `@` selects the profile when `resolver` knows
    /// it. Otherwise `default_profile` is used and the input is the text before
    /// the first `@`.
    pub fn parse(raw: &str, resolver: &ProfileResolver, default_profile: &str) -> Self {
        if let Some((input, profile)) = raw.rsplit_once('@') {
            let profile = profile.trim();
            if resolver.is_known(profile) {
                return Self {
                    input: PathBuf::from(input),
                    profile: profile.to_string(),
                };
            }
        }

        let input = raw.split('@').next().unwrap_or(raw);
        Self {
            input: PathBuf::from(input),
            profile: default_profile.to_string(),
        }
    }
}

/// Whether `path` has one of the [`MEDIA_EXTENSIONS`].
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MEDIA_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// File name of `path` for display, falling back to the whole path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// One-line summary of a finished conversion.
pub fn format_summary(result: &ConversionResult) -> String {
    format!(
        "Resumen: {} → {} | Perfil: {} | Duración salida: {} | Progreso final: {}",
        display_name(&result.input_path),
        display_name(&result.output_path),
        result.profile_name,
        format_duration(result.output_duration_secs),
        result
            .last_progress_sample
            .as_ref()
            .map(|s| s.as_str())
            .unwrap_or_default()
    )
}
