//! Converter module for transcoding media files.
//!
//! A [`ConversionProfile`](crate::profile::ConversionProfile) is planned into
//! one or two engine passes ([`PassPlan`]), which the [`Orchestrator`] runs
//! strictly in sequence on an [`Engine`]. While a pass runs, the engine reads
//! its diagnostic stream and forwards elapsed-time samples over a channel to a
//! [`ProgressDisplay`].
//!
//! # Example
//!
//! ```ignore
//! use mediacraft_core::converter::{ConverterConfig, FfmpegEngine, Orchestrator, ProgressDisplay};
//! use mediacraft_core::profile::ProfileResolver;
//!
//! let config = ConverterConfig::default();
//! let orchestrator = Orchestrator::new(FfmpegEngine::new(config.clone()), config);
//! let profile = ProfileResolver::builtin_only().resolve("plex");
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! let display = ProgressDisplay::spawn("01:30:00", rx);
//! let result = orchestrator.run(input, &profile, output, tx).await;
//! let last = display.finish().await;
//! ```

mod config;
mod display;
mod error;
mod ffmpeg;
mod orchestrator;
mod plan;
mod progress;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use display::{format_duration, ProgressDisplay};
pub use error::ConverterError;
pub use ffmpeg::FfmpegEngine;
pub use orchestrator::Orchestrator;
pub use plan::{
    build_job, build_plan, telegram_video_bitrate_kbps, uses_hwaccel, PlanStrategy,
    TELEGRAM_FALLBACK_KBPS, TELEGRAM_MIN_KBPS,
};
pub use progress::{extract_time, scan_progress};
pub use traits::Engine;
pub use types::{ConversionJob, ConversionResult, JobState, PassPlan, ProgressSample};
