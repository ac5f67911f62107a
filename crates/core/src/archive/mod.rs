//! Archive module for detecting, reassembling and extracting compressed inputs.
//!
//! Downloads often arrive as archives, sometimes split into volumes
//! (`movie.part01.rar`, `movie.7z.001`, `movie.z01`). Before transcoding, the
//! fragments of each group are concatenated in volume order and handed to an
//! external 7z-compatible tool.
//!
//! # Example
//!
//! ```ignore
//! use mediacraft_core::archive::{Extractor, ExtractorConfig};
//!
//! let extractor = Extractor::new(ExtractorConfig::default());
//! let extraction = extractor.extract_all(Path::new("/downloads/movie.part1.rar")).await?;
//! for file in &extraction.files {
//!     println!("{}", file.display());
//! }
//! ```

mod classifier;
mod config;
mod error;
mod extractor;
mod reassembler;
mod types;

pub use classifier::{find_archives, is_archive, ARCHIVE_EXTENSIONS};
pub use config::ExtractorConfig;
pub use error::ArchiveError;
pub use extractor::Extractor;
pub use reassembler::{reassemble, FragmentPattern};
pub use types::{ArchiveGroup, ArchivePart, Extraction, Reassembly};
