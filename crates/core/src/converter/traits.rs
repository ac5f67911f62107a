//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::mpsc;

use super::error::ConverterError;
use super::types::ProgressSample;

/// A transcoding engine that runs one pass at a time.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Runs one pass with `args` and waits for it to exit.
    ///
    /// Elapsed-time samples are forwarded to `progress_tx` while the pass runs.
    /// If the receiver is dropped, the pass continues without reporting.
    /// Returns the last sample seen.
    async fn run_pass(
        &self,
        pass: u8,
        args: &[String],
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<Option<ProgressSample>, ConverterError>;

    /// Probes the duration of a media file in seconds.
    async fn probe_duration(&self, path: &Path) -> Result<f64, ConverterError>;
}
