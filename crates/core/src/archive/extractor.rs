//! Extraction through an external 7z-compatible tool.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::classifier::find_archives;
use super::config::ExtractorConfig;
use super::error::ArchiveError;
use super::reassembler::reassemble;
use super::types::{Extraction, Reassembly};

/// Runs the extraction tool over every archive found at a path.
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extracts every archive under `path`.
    ///
    /// When nothing at `path` is an archive the result is `path` itself and no
    /// temporary directory is created. Fragments already joined as part of an
    /// earlier group are not extracted a second time. A failed join falls back
    /// to handing the first fragment to the tool unchanged.
    pub async fn extract_all(&self, path: &Path) -> Result<Extraction, ArchiveError> {
        let archives = find_archives(path);
        if archives.is_empty() {
            return Ok(Extraction {
                files: vec![path.to_path_buf()],
                temp_dirs: Vec::new(),
            });
        }

        let mut extraction = Extraction::default();
        let mut consumed: HashSet<PathBuf> = HashSet::new();

        for archive in archives {
            if consumed.contains(&archive) {
                debug!("Skipping {:?}, already joined with its group", archive);
                continue;
            }

            let reassembly = match reassemble(&archive, &self.config.temp_dir).await {
                Ok(reassembly) => reassembly,
                Err(e @ ArchiveError::Reassembly { .. }) => {
                    warn!("{}; extracting {:?} as is", e, archive);
                    Reassembly::Unchanged(archive.clone())
                }
                Err(e) => return Err(e),
            };
            if let Reassembly::Joined { parts, .. } = &reassembly {
                consumed.extend(parts.iter().map(|p| p.path()));
            }

            let dest = self.create_extraction_dir()?;
            self.run_tool(reassembly.path(), &dest).await?;

            let mut files = list_files(&dest);
            info!(
                "Extracted {} file(s) from {:?} into {:?}",
                files.len(),
                archive,
                dest
            );
            extraction.files.append(&mut files);
            extraction.temp_dirs.push(dest);
        }

        Ok(extraction)
    }

    fn create_extraction_dir(&self) -> Result<PathBuf, ArchiveError> {
        let temp_root = &self.config.temp_dir;
        std::fs::create_dir_all(temp_root).map_err(|source| ArchiveError::TempDir {
            path: temp_root.clone(),
            source,
        })?;

        tempfile::Builder::new()
            .prefix("mediacraft_unzip_")
            .tempdir_in(temp_root)
            .map(|dir| dir.keep())
            .map_err(|source| ArchiveError::TempDir {
                path: temp_root.clone(),
                source,
            })
    }

    /// Runs `<tool> x <archive> -o<dest> -y`.
    async fn run_tool(&self, archive: &Path, dest: &Path) -> Result<(), ArchiveError> {
        let mut dest_arg = std::ffi::OsString::from("-o");
        dest_arg.push(dest.as_os_str());

        debug!(
            "Running {:?} x {:?} {:?} -y",
            self.config.tool_path, archive, dest_arg
        );

        let output = Command::new(&self.config.tool_path)
            .arg("x")
            .arg(archive)
            .arg(&dest_arg)
            .arg("-y")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ArchiveError::ToolNotFound {
                        path: self.config.tool_path.clone(),
                    }
                } else {
                    ArchiveError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ArchiveError::ExtractionFailed {
                archive: archive.to_path_buf(),
                code: output.status.code(),
                stderr: if stderr.is_empty() { None } else { Some(stderr) },
            });
        }

        Ok(())
    }
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}
