//! Mock engine for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::converter::{ConverterError, Engine, ProgressSample};

/// A recorded engine pass for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    /// Pass number, starting at 1.
    pub pass: u8,
    /// Arguments the pass was started with.
    pub args: Vec<String>,
}

impl EngineInvocation {
    /// The last argument, which is where the pass writes.
    pub fn target(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    /// Whether this pass writes to the null sink.
    pub fn is_analysis(&self) -> bool {
        self.args.iter().any(|a| a == "-an")
            && self.args.windows(2).any(|w| w[0] == "-f" && w[1] == "null")
    }
}

/// Mock implementation of the Engine trait.
///
/// Provides controllable behavior for testing:
/// - Track passes and probes for assertions
/// - Simulate pass failures
/// - Emit progress samples
/// - Write a fake output file on encoding passes
///
/// Clones share their recorded state.
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// Recorded passes.
    invocations: Arc<RwLock<Vec<EngineInvocation>>>,
    /// Recorded probe paths.
    probed: Arc<RwLock<Vec<PathBuf>>>,
    /// If set, the next pass will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// If set, the pass with this number fails with exit code 1.
    failing_pass: Arc<RwLock<Option<u8>>>,
    /// Duration reported by probes; `None` makes probes fail.
    duration: Arc<RwLock<Option<f64>>>,
    /// Samples emitted by every pass.
    samples: Vec<ProgressSample>,
    /// Bytes written to the output of encoding passes.
    output_bytes: Option<Vec<u8>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Create a new mock engine.
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(RwLock::new(Vec::new())),
            probed: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            failing_pass: Arc::new(RwLock::new(None)),
            duration: Arc::new(RwLock::new(Some(0.0))),
            samples: Vec::new(),
            output_bytes: None,
        }
    }

    /// Emit these samples on every pass.
    pub fn with_samples<S: Into<String>>(mut self, samples: Vec<S>) -> Self {
        self.samples = samples.into_iter().map(ProgressSample::new).collect();
        self
    }

    /// Write these bytes to the output path of encoding passes.
    pub fn with_output_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.output_bytes = Some(bytes);
        self
    }

    /// Get all recorded passes.
    pub async fn invocations(&self) -> Vec<EngineInvocation> {
        self.invocations.read().await.clone()
    }

    /// Get every path that was probed.
    pub async fn probed(&self) -> Vec<PathBuf> {
        self.probed.read().await.clone()
    }

    /// Configure the next pass to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every pass with this number fail.
    pub async fn fail_pass(&self, pass: u8) {
        *self.failing_pass.write().await = Some(pass);
    }

    /// Set the duration reported by probes.
    pub async fn set_duration(&self, secs: f64) {
        *self.duration.write().await = Some(secs);
    }

    /// Make probes fail.
    pub async fn set_probe_failure(&self) {
        *self.duration.write().await = None;
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ConverterError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Engine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run_pass(
        &self,
        pass: u8,
        args: &[String],
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<Option<ProgressSample>, ConverterError> {
        let invocation = EngineInvocation {
            pass,
            args: args.to_vec(),
        };
        self.invocations.write().await.push(invocation.clone());

        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        if *self.failing_pass.read().await == Some(pass) {
            return Err(ConverterError::pass_failed(
                pass,
                Some(1),
                Some("mock failure".to_string()),
            ));
        }

        for sample in &self.samples {
            let _ = progress_tx.send(sample.clone()).await;
        }

        if let (Some(bytes), Some(target)) = (&self.output_bytes, invocation.target()) {
            if !invocation.is_analysis() {
                tokio::fs::write(target, bytes).await?;
            }
        }

        Ok(self.samples.last().cloned())
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, ConverterError> {
        self.probed.write().await.push(path.to_path_buf());
        match *self.duration.read().await {
            Some(secs) => Ok(secs),
            None => Err(ConverterError::probe_failed("mock probe failure")),
        }
    }
}
