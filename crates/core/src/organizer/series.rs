//! Sorting a folder of episodes into season folders.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::season::detect_season;
use crate::archive::{ArchiveError, Extractor};

/// Season assigned to files with no recognizable marker.
pub const FALLBACK_SEASON: u32 = 1;

/// Errors from organizing a series folder.
#[derive(Debug, Error)]
pub enum OrganizerError {
    /// The target is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Extracting archives in the folder failed.
    #[error("Archive extraction failed: {0}")]
    Archive(#[from] ArchiveError),

    /// Listing, creating or moving failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OrganizerError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// What [`organize_series`] moved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesReport {
    /// Directories whose files were sorted.
    pub directories: Vec<PathBuf>,
    /// Destination paths per season.
    pub seasons: BTreeMap<u32, Vec<PathBuf>>,
}

impl SeriesReport {
    pub fn moved_count(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }
}

/// Folder name for a season, e.g. `Temporada 2`.
pub fn season_dir_name(prefix: &str, season: u32) -> String {
    format!("{} {}", prefix, season)
}

/// Sorts the files of a series folder into `<prefix> <N>` folders.
///
/// Archives in `dir` are extracted first and the extracted folders are sorted
/// instead. Only regular files directly inside a folder are moved.
pub async fn organize_series(
    dir: &Path,
    extractor: &Extractor,
    prefix: &str,
) -> Result<SeriesReport, OrganizerError> {
    if !dir.is_dir() {
        return Err(OrganizerError::NotADirectory(dir.to_path_buf()));
    }

    let extraction = extractor.extract_all(dir).await?;
    let directories = if extraction.extracted() {
        info!(
            "Archives found in {:?}, sorting {} extraction folder(s)",
            dir,
            extraction.temp_dirs.len()
        );
        extraction.temp_dirs
    } else {
        vec![dir.to_path_buf()]
    };

    let mut report = SeriesReport::default();
    for directory in directories {
        sort_directory(&directory, prefix, &mut report).await?;
        report.directories.push(directory);
    }

    info!("Moved {} file(s) into season folders", report.moved_count());
    Ok(report)
}

async fn sort_directory(
    dir: &Path,
    prefix: &str,
    report: &mut SeriesReport,
) -> Result<(), OrganizerError> {
    let mut by_season: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| OrganizerError::io(dir, e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| OrganizerError::io(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| OrganizerError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let season = detect_season(&name).unwrap_or(FALLBACK_SEASON);
        by_season.entry(season).or_default().push(name);
    }

    for (season, mut names) in by_season {
        names.sort();
        let season_dir = dir.join(season_dir_name(prefix, season));
        tokio::fs::create_dir_all(&season_dir)
            .await
            .map_err(|e| OrganizerError::io(&season_dir, e))?;

        for name in names {
            let from = dir.join(&name);
            let to = season_dir.join(&name);
            debug!("Moving {:?} to {:?}", from, to);
            tokio::fs::rename(&from, &to)
                .await
                .map_err(|e| OrganizerError::io(&from, e))?;
            report.seasons.entry(season).or_default().push(to);
        }
    }

    Ok(())
}
