//! Conversion processor implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::archive::{ArchiveError, Extractor};
use crate::converter::{
    format_duration, ConversionResult, ConverterError, Engine, Orchestrator, ProgressDisplay,
};
use crate::notifier::{spawn_notification, NotificationTask, Notifier};
use crate::profile::{ConversionProfile, ProfileResolver};

use super::config::ProcessorConfig;
use super::types::{format_summary, is_media_file, ConversionRequest};

/// Samples buffered between the engine and the display.
const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Error type for processing a request.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// The requested input does not exist.
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    /// Nothing convertible was found at the input.
    #[error("No media files found in {0}")]
    NoMediaFound(PathBuf),

    /// Archive handling failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Conversion failed.
    #[error(transparent)]
    Converter(#[from] ConverterError),

    /// The output location could not be determined.
    #[error("Failed to resolve output directory: {0}")]
    OutputDirectory(#[source] std::io::Error),
}

/// Everything one request produced.
#[derive(Debug, Default)]
pub struct RequestOutcome {
    pub request: Option<ConversionRequest>,
    pub results: Vec<ConversionResult>,
    pub summaries: Vec<String>,
}

/// Drives requests through extraction, profile resolution and conversion.
pub struct ConversionProcessor<E: Engine> {
    config: ProcessorConfig,
    orchestrator: Orchestrator<E>,
    extractor: Extractor,
    resolver: ProfileResolver,
    notifier: Option<Arc<dyn Notifier>>,
    pending: Mutex<Vec<NotificationTask>>,
}

impl<E: Engine> ConversionProcessor<E> {
    /// Creates a new processor.
    pub fn new(
        config: ProcessorConfig,
        orchestrator: Orchestrator<E>,
        extractor: Extractor,
        resolver: ProfileResolver,
    ) -> Self {
        Self {
            config,
            orchestrator,
            extractor,
            resolver,
            notifier: None,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Sends a summary through `notifier` after each conversion.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Parses a `path[@profile]` request against the known profiles.
    pub fn parse_request(&self, raw: &str) -> ConversionRequest {
        ConversionRequest::parse(raw, &self.resolver, &self.config.default_profile)
    }

    /// Processes one request.
    ///
    /// Archives are extracted first. Every media file found is converted in
    /// turn; the first failure aborts the request.
    pub async fn process(&self, raw: &str) -> Result<RequestOutcome, ProcessorError> {
        let request = self.parse_request(raw);
        let input = &request.input;
        if !input.exists() {
            return Err(ProcessorError::InputNotFound(input.clone()));
        }

        let profile = self.resolver.resolve(&request.profile);
        info!("Processing {:?} with profile '{}'", input, profile.name);

        let media = self.collect_media(input).await?;
        let output_dir = self.output_dir()?;

        let mut outcome = RequestOutcome::default();
        for file in media {
            let output = output_path_for(&file, &profile, &output_dir);
            let result = self.convert_one(&file, &profile, &output).await?;
            let summary = format_summary(&result);
            info!("{}", summary);

            if let Some(notifier) = &self.notifier {
                let task = spawn_notification(notifier.clone(), summary.clone());
                self.pending.lock().await.push(task);
            }

            outcome.results.push(result);
            outcome.summaries.push(summary);
        }
        outcome.request = Some(request);

        Ok(outcome)
    }

    /// Waits for every notification sent so far.
    ///
    /// Returns how many were delivered.
    pub async fn flush_notifications(&self, timeout: Duration) -> usize {
        let tasks: Vec<NotificationTask> = std::mem::take(&mut *self.pending.lock().await);
        let mut delivered = 0;
        for task in tasks {
            if task.wait(timeout).await {
                delivered += 1;
            }
        }
        delivered
    }

    async fn collect_media(&self, input: &Path) -> Result<Vec<PathBuf>, ProcessorError> {
        let extraction = self.extractor.extract_all(input).await?;

        let media: Vec<PathBuf> = if extraction.extracted() {
            extraction
                .files
                .into_iter()
                .filter(|f| is_media_file(f))
                .collect()
        } else if input.is_dir() {
            let mut files: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| is_media_file(path))
                .collect();
            files.sort();
            files
        } else {
            vec![input.to_path_buf()]
        };

        if media.is_empty() {
            return Err(ProcessorError::NoMediaFound(input.to_path_buf()));
        }
        Ok(media)
    }

    fn output_dir(&self) -> Result<PathBuf, ProcessorError> {
        let cwd = std::env::current_dir().map_err(ProcessorError::OutputDirectory)?;
        Ok(match &self.config.output_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd,
        })
    }

    async fn convert_one(
        &self,
        input: &Path,
        profile: &ConversionProfile,
        output: &Path,
    ) -> Result<ConversionResult, ProcessorError> {
        info!("Converting {:?} -> {:?}", input, output);

        let total = self.orchestrator.probe_or_zero(input).await;
        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let display = if self.config.show_progress {
            ProgressDisplay::spawn(format_duration(total), rx)
        } else {
            ProgressDisplay::hidden(format_duration(total), rx)
        };

        // The probe above also feeds the size-targeted plan.
        let job = self
            .orchestrator
            .plan_with_duration(input, profile, output, total);
        let result = self.orchestrator.execute(&job, tx).await;
        let last_seen = display.finish().await;

        match result {
            Ok(mut result) => {
                if last_seen.is_some() {
                    result.last_progress_sample = last_seen;
                }
                Ok(result)
            }
            Err(e) => {
                warn!("Conversion of {:?} failed: {}", input, e);
                Err(e.into())
            }
        }
    }
}

/// `<output_dir>/<input stem><profile extension>`.
///
/// When that would overwrite the input, the profile name is appended to the
/// stem.
pub fn output_path_for(input: &Path, profile: &ConversionProfile, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string());

    let output = output_dir.join(format!("{}{}", stem, profile.output_extension));
    if same_file(input, &output) {
        output_dir.join(format!(
            "{}_{}{}",
            stem, profile.name, profile.output_extension
        ))
    } else {
        output
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
