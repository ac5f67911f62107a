//! Processor module for conversion requests.
//!
//! A request is a path with an optional `@profile` suffix. The
//! `ConversionProcessor` coordinates:
//! - Extraction: archives (split or not) are reassembled and unpacked
//! - Discovery: media files inside directories or extractions are collected
//! - Conversion: each file is transcoded with the resolved profile
//! - Notification: a summary is sent once each file is done
//!
//! # Example
//!
//! ```ignore
//! use mediacraft_core::processor::{ConversionProcessor, ProcessorConfig};
//!
//! let processor = ConversionProcessor::new(config, orchestrator, extractor, resolver);
//! let outcome = processor.process("movie.part1.rar@plex").await?;
//! for summary in &outcome.summaries {
//!     println!("{}", summary);
//! }
//! ```

mod config;
mod pipeline;
mod types;

pub use config::ProcessorConfig;
pub use pipeline::{output_path_for, ConversionProcessor, ProcessorError, RequestOutcome};
pub use types::{format_summary, is_media_file, ConversionRequest, MEDIA_EXTENSIONS};
