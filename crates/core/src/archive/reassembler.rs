//! Reassembly of split archive fragments.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use super::error::ArchiveError;
use super::types::{ArchiveGroup, ArchivePart, Reassembly};

static PART_VOLUME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+)\.part0*([1-9][0-9]*)\.(rar|7z|zip|tar|gz|bz2|lz|lzma|xz)$")
        .expect("valid part volume regex")
});

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+)\.0*([1-9][0-9]*)$").expect("valid numeric volume regex"));

static SPLIT_ZIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+)\.z0*([1-9][0-9]*)$").expect("valid split zip regex"));

/// Fragment naming schemes, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentPattern {
    /// `<prefix>.part<N>.<archiveExt>`
    PartVolume,
    /// `<prefix>.<N>`
    Numeric,
    /// `<prefix>.z<N>`
    SplitZip,
}

impl FragmentPattern {
    pub const ALL: [FragmentPattern; 3] = [Self::PartVolume, Self::Numeric, Self::SplitZip];

    fn regex(self) -> &'static Regex {
        match self {
            Self::PartVolume => &PART_VOLUME,
            Self::Numeric => &NUMERIC,
            Self::SplitZip => &SPLIT_ZIP,
        }
    }

    /// Parses `file_name` as a fragment of this scheme.
    pub fn parse(self, directory: &Path, file_name: &str) -> Option<ArchivePart> {
        let caps = self.regex().captures(file_name)?;
        let group_key = caps.get(1)?.as_str().to_string();
        let sequence_index = caps.get(2)?.as_str().parse::<u32>().ok()?;
        let extension = caps.get(3).map(|m| format!(".{}", m.as_str()));

        Some(ArchivePart {
            directory: directory.to_path_buf(),
            file_name: file_name.to_string(),
            group_key,
            sequence_index,
            extension,
        })
    }

    /// Finds the first scheme `file_name` matches.
    pub fn detect(directory: &Path, file_name: &str) -> Option<(Self, ArchivePart)> {
        Self::ALL
            .iter()
            .find_map(|pattern| pattern.parse(directory, file_name).map(|p| (*pattern, p)))
    }
}

/// Joins the fragments `path` belongs to into one temporary file.
///
/// Returns [`Reassembly::Unchanged`] when `path` is not a fragment or is the
/// only member of its group. The joined file is created in `temp_dir` and is
/// not removed afterwards.
pub async fn reassemble(path: &Path, temp_dir: &Path) -> Result<Reassembly, ArchiveError> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Reassembly::Unchanged(path.to_path_buf()));
    };
    let directory = containing_dir(path);

    let Some((pattern, candidate)) = FragmentPattern::detect(&directory, file_name) else {
        return Ok(Reassembly::Unchanged(path.to_path_buf()));
    };

    let group = collect_group(path, &directory, pattern, &candidate).await?;
    if group.len() <= 1 {
        debug!("{:?} is the only part of group '{}'", path, group.group_key());
        return Ok(Reassembly::Unchanged(path.to_path_buf()));
    }

    info!(
        "Joining {} parts of '{}' ({:?})",
        group.len(),
        group.group_key(),
        pattern
    );
    let joined = join_parts(path, &group, candidate.extension.as_deref(), temp_dir).await?;

    Ok(Reassembly::Joined {
        path: joined,
        parts: group.parts().to_vec(),
    })
}

fn containing_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Scans `directory` for every sibling of `candidate` under the same scheme.
async fn collect_group(
    path: &Path,
    directory: &Path,
    pattern: FragmentPattern,
    candidate: &ArchivePart,
) -> Result<ArchiveGroup, ArchiveError> {
    let mut entries = fs::read_dir(directory)
        .await
        .map_err(|e| ArchiveError::reassembly(path, e))?;

    let mut parts = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ArchiveError::reassembly(path, e))?
    {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let Some(part) = pattern.parse(directory, &name) else {
            continue;
        };
        if part.group_key != candidate.group_key || !same_extension(&part, candidate) {
            continue;
        }
        match fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_file() => parts.push(part),
            _ => continue,
        }
    }

    parts.sort_by_key(|p| p.sequence_index);

    if let Some(pair) = parts
        .windows(2)
        .find(|pair| pair[0].sequence_index == pair[1].sequence_index)
    {
        return Err(ArchiveError::DuplicatePart {
            path: path.to_path_buf(),
            group_key: candidate.group_key.clone(),
            index: pair[0].sequence_index,
            first: pair[0].file_name.clone(),
            second: pair[1].file_name.clone(),
        });
    }

    Ok(ArchiveGroup::new(candidate.group_key.clone(), parts))
}

fn same_extension(part: &ArchivePart, candidate: &ArchivePart) -> bool {
    match (&part.extension, &candidate.extension) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

/// Streams every part, in order, into a new file under `temp_dir`.
async fn join_parts(
    path: &Path,
    group: &ArchiveGroup,
    extension: Option<&str>,
    temp_dir: &Path,
) -> Result<PathBuf, ArchiveError> {
    fs::create_dir_all(temp_dir)
        .await
        .map_err(|e| ArchiveError::reassembly(path, e))?;

    let (file, joined_path) = tempfile::Builder::new()
        .prefix("mediacraft_joined_")
        .suffix(extension.unwrap_or(""))
        .tempfile_in(temp_dir)
        .and_then(|f| f.keep().map_err(|e| e.error))
        .map_err(|e| ArchiveError::reassembly(path, e))?;

    let result = async {
        let mut writer = BufWriter::new(File::from_std(file));
        for part in group.parts() {
            let mut reader = File::open(part.path()).await?;
            let copied = tokio::io::copy(&mut reader, &mut writer).await?;
            debug!("Appended {} ({} bytes)", part.file_name, copied);
        }
        writer.flush().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&joined_path).await;
        return Err(ArchiveError::reassembly(path, e));
    }

    Ok(joined_path)
}
