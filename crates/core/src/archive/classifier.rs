//! Detection of compressed and multi-volume files.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::processor::is_media_file;

/// Extensions treated as compressed artifacts, including first-volume markers.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".lz", ".lzma", ".z01", ".001", ".part1",
    ".part01",
];

static FIRST_VOLUME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(part|vol|disk)?0*1(\.|$)").expect("valid first volume regex"));

static NAMED_FIRST_VOLUME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(part|vol|disk)0*1(\.|$)").expect("valid named volume regex"));

/// Whether `path` looks like an archive or the first volume of a split one.
///
/// A bare `.1.`/`.01.` marker is ignored on media files, so numbered episodes
/// such as `Show.01.mkv` stay media.
pub fn is_archive(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = format!(".{}", ext.to_lowercase());
        if ARCHIVE_EXTENSIONS.iter().any(|known| ext.ends_with(known)) {
            return true;
        }
    }

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if is_media_file(path) {
        NAMED_FIRST_VOLUME.is_match(name)
    } else {
        FIRST_VOLUME.is_match(name)
    }
}

/// Collects every archive at `path`.
///
/// Files are classified directly; directories are walked recursively and
/// every regular file is classified. Traversal errors count as "no match".
pub fn find_archives(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return if path.is_file() && is_archive(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut archives: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry under {:?}: {}", path, e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| is_archive(p))
        .collect();

    archives.sort();
    archives
}
