//! Types for the archive module.

use std::path::{Path, PathBuf};

/// One fragment of a split archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePart {
    /// Directory holding the fragment.
    pub directory: PathBuf,
    /// Bare file name of the fragment.
    pub file_name: String,
    /// Prefix shared by every fragment of the same logical archive.
    pub group_key: String,
    /// Numeric volume suffix (`.part03` -> 3, `.z07` -> 7, `.007` -> 7).
    pub sequence_index: u32,
    /// Trailing archive extension (`.rar`), only known for `.partN.ext` names.
    pub extension: Option<String>,
}

impl ArchivePart {
    /// Full path of the fragment.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Fragments of one archive, sorted by ascending sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveGroup {
    group_key: String,
    parts: Vec<ArchivePart>,
}

impl ArchiveGroup {
    pub(crate) fn new(group_key: String, parts: Vec<ArchivePart>) -> Self {
        Self { group_key, parts }
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    pub fn parts(&self) -> &[ArchivePart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Outcome of reassembling a candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reassembly {
    /// The path is not a fragment, or the only member of its group.
    Unchanged(PathBuf),
    /// Fragments were concatenated into a new temporary file.
    Joined {
        path: PathBuf,
        parts: Vec<ArchivePart>,
    },
}

impl Reassembly {
    /// Path to hand to the extraction tool.
    pub fn path(&self) -> &Path {
        match self {
            Self::Unchanged(path) => path,
            Self::Joined { path, .. } => path,
        }
    }

    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined { .. })
    }
}

/// Result of running the extraction step over an input path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Files to work on. Equals the input path when nothing was extracted.
    pub files: Vec<PathBuf>,
    /// Temporary directories created for extracted archives.
    pub temp_dirs: Vec<PathBuf>,
}

impl Extraction {
    /// Whether any archive was actually extracted.
    pub fn extracted(&self) -> bool {
        !self.temp_dirs.is_empty()
    }
}
