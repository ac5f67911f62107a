//! Sequential execution of a job's passes.

use chrono::Utc;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::plan::{build_job, PlanStrategy};
use super::traits::Engine;
use super::types::{ConversionJob, ConversionResult, JobState, ProgressSample};
use crate::profile::ConversionProfile;

/// Plans and runs conversions on an [`Engine`].
///
/// Passes run strictly one after another. A failed pass aborts the job and
/// leaves any partial output on disk.
pub struct Orchestrator<E: Engine> {
    engine: E,
    config: ConverterConfig,
}

impl<E: Engine> Orchestrator<E> {
    pub fn new(engine: E, config: ConverterConfig) -> Self {
        Self { engine, config }
    }

    /// Probes `path`, treating any failure as an unknown (zero) duration.
    pub async fn probe_or_zero(&self, path: &Path) -> f64 {
        match self.engine.probe_duration(path).await {
            Ok(duration) => duration,
            Err(e) => {
                warn!("Could not probe {}: {}", path.display(), e);
                0.0
            }
        }
    }

    /// Computes the job for converting `input` to `output`.
    pub async fn plan(
        &self,
        input: &Path,
        profile: &ConversionProfile,
        output: &Path,
    ) -> ConversionJob {
        let duration = if PlanStrategy::for_profile(&profile.name).needs_duration() {
            self.probe_or_zero(input).await
        } else {
            0.0
        };
        self.plan_with_duration(input, profile, output, duration)
    }

    /// Computes the job using an input duration the caller already probed.
    pub fn plan_with_duration(
        &self,
        input: &Path,
        profile: &ConversionProfile,
        output: &Path,
        duration_secs: f64,
    ) -> ConversionJob {
        build_job(input, profile.clone(), output, duration_secs, &self.config)
    }

    /// Plans and runs a conversion.
    pub async fn run(
        &self,
        input: &Path,
        profile: &ConversionProfile,
        output: &Path,
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<ConversionResult, ConverterError> {
        let mut state = JobState::Idle;
        transition(&mut state, JobState::Planning, input);
        let job = self.plan(input, profile, output).await;
        self.execute_from(&mut state, &job, progress_tx).await
    }

    /// Runs an already planned job.
    pub async fn execute(
        &self,
        job: &ConversionJob,
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<ConversionResult, ConverterError> {
        let mut state = JobState::Planning;
        self.execute_from(&mut state, job, progress_tx).await
    }

    async fn execute_from(
        &self,
        state: &mut JobState,
        job: &ConversionJob,
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<ConversionResult, ConverterError> {
        if let Some(parent) = job.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(source) = tokio::fs::create_dir_all(parent).await {
                    transition(state, JobState::Failed, &job.input_path);
                    return Err(ConverterError::OutputDirectoryFailed {
                        path: parent.to_path_buf(),
                        source,
                    });
                }
            }
        }

        let mut last_sample = None;
        for (pass, args) in job.pass_plan.passes() {
            transition(state, JobState::running(pass), &job.input_path);
            debug!("Pass {} of {} with {}", pass, job.pass_plan.pass_count(), self.engine.name());

            match self.engine.run_pass(pass, args, progress_tx.clone()).await {
                Ok(sample) => {
                    if sample.is_some() {
                        last_sample = sample;
                    }
                    info!("Pass {} finished for {}", pass, job.input_path.display());
                }
                Err(e) => {
                    transition(state, JobState::Failed, &job.input_path);
                    return Err(e);
                }
            }
        }

        let completed_at = Utc::now();
        transition(state, JobState::Completed, &job.input_path);

        let output_duration_secs = self.output_duration(&job.output_path).await;

        Ok(ConversionResult {
            input_path: job.input_path.clone(),
            output_path: job.output_path.clone(),
            profile_name: job.profile.name.clone(),
            output_duration_secs,
            last_progress_sample: last_sample,
            completed_at,
        })
    }

    /// Duration of the produced output; 0 when it is absent or empty.
    async fn output_duration(&self, output: &Path) -> f64 {
        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => self.probe_or_zero(output).await,
            Ok(_) => 0.0,
            Err(_) => {
                warn!("Output {} was not created", output.display());
                0.0
            }
        }
    }
}

fn transition(state: &mut JobState, next: JobState, input: &Path) {
    info!("Job for {}: {} -> {}", input.display(), state, next);
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::PassPlan;
    use crate::profile::ProfileResolver;
    use crate::testing::MockEngine;
    use tempfile::TempDir;

    fn orchestrator(engine: MockEngine) -> Orchestrator<MockEngine> {
        Orchestrator::new(engine, ConverterConfig::default())
    }

    #[tokio::test]
    async fn test_two_pass_runs_in_order() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("movie.mkv");
        let output = dir.path().join("out").join("movie.mkv");
        let engine = MockEngine::new().with_output_bytes(b"encoded".to_vec());
        engine.set_duration(5400.0).await;
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("plex");
        let (tx, _rx) = mpsc::channel(8);

        let result = orchestrator.run(&input, &profile, &output, tx).await.unwrap();

        let calls = engine.invocations().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].pass, 1);
        assert_eq!(calls[1].pass, 2);
        assert!(calls[0].args.contains(&"-an".to_string()));
        assert_eq!(result.profile_name, "plex");
        assert_eq!(result.output_duration_secs, 5400.0);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_failed_first_pass_stops_plan() {
        let dir = TempDir::new().unwrap();
        let engine = MockEngine::new();
        engine
            .set_next_error(ConverterError::pass_failed(1, Some(1), None))
            .await;
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("media");
        let (tx, _rx) = mpsc::channel(8);

        let err = orchestrator
            .run(
                &dir.path().join("a.mkv"),
                &profile,
                &dir.path().join("a.out.mkv"),
                tx,
            )
            .await
            .unwrap_err();

        assert_eq!(err.failed_pass(), Some(1));
        assert_eq!(engine.invocations().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_output_has_zero_duration() {
        let dir = TempDir::new().unwrap();
        let engine = MockEngine::new();
        engine.set_duration(90.0).await;
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("unknown-name");
        let (tx, _rx) = mpsc::channel(8);

        let result = orchestrator
            .run(
                &dir.path().join("a.avi"),
                &profile,
                &dir.path().join("a.mp4"),
                tx,
            )
            .await
            .unwrap();
        assert_eq!(result.output_duration_secs, 0.0);
        assert!(!engine.invocations().await[0]
            .args
            .contains(&"-hwaccel".to_string()));
    }

    #[tokio::test]
    async fn test_telegram_probes_input() {
        let dir = TempDir::new().unwrap();
        let engine = MockEngine::new();
        engine.set_duration(3600.0).await;
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("telegram");

        let job = orchestrator
            .plan(&dir.path().join("a.mkv"), &profile, &dir.path().join("a.mp4"))
            .await;
        let PassPlan::SinglePass(args) = &job.pass_plan else {
            panic!("telegram should be single-pass");
        };
        assert!(args.contains(&"8223k".to_string()));
        assert_eq!(engine.probed().await, vec![dir.path().join("a.mkv")]);
    }

    #[tokio::test]
    async fn test_last_sample_is_reported() {
        let dir = TempDir::new().unwrap();
        let engine = MockEngine::new().with_samples(vec!["00:00:01.00", "00:00:04.20"]);
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("movil");
        let (tx, mut rx) = mpsc::channel(8);

        let result = orchestrator
            .run(
                &dir.path().join("a.mkv"),
                &profile,
                &dir.path().join("a.mp4"),
                tx,
            )
            .await
            .unwrap();

        assert_eq!(
            result.last_progress_sample,
            Some(ProgressSample::new("00:00:04.20"))
        );
        assert_eq!(rx.recv().await, Some(ProgressSample::new("00:00:01.00")));
    }

    #[tokio::test]
    async fn test_failed_probe_uses_fallback_bitrate() {
        let dir = TempDir::new().unwrap();
        let engine = MockEngine::new();
        engine.set_probe_failure().await;
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("telegram");

        let job = orchestrator
            .plan(&dir.path().join("a.mkv"), &profile, &dir.path().join("a.mp4"))
            .await;

        let PassPlan::SinglePass(args) = &job.pass_plan else {
            panic!("telegram should be single-pass");
        };
        let at = args.iter().position(|a| a == "-b:v").unwrap();
        assert_eq!(args[at + 1], "2500k");
    }

    #[tokio::test]
    async fn test_failed_output_probe_has_zero_duration() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("a.mp4");
        let engine = MockEngine::new().with_output_bytes(b"encoded".to_vec());
        engine.set_probe_failure().await;
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("movil");
        let (tx, _rx) = mpsc::channel(8);

        let result = orchestrator
            .run(&dir.path().join("a.mkv"), &profile, &output, tx)
            .await
            .unwrap();

        assert!(std::fs::metadata(&output).unwrap().len() > 0);
        assert_eq!(result.output_duration_secs, 0.0);
        assert_eq!(engine.probed().await, vec![output]);
    }

    #[tokio::test]
    async fn test_execute_with_known_duration_skips_input_probe() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("a.mkv");
        let output = dir.path().join("a.mp4");
        let engine = MockEngine::new();
        let orchestrator = orchestrator(engine.clone());
        let profile = ProfileResolver::builtin_only().resolve("telegram");
        let (tx, _rx) = mpsc::channel(8);

        let job = orchestrator.plan_with_duration(&input, &profile, &output, 3600.0);
        let result = orchestrator.execute(&job, tx).await.unwrap();

        assert_eq!(result.output_path, output);
        assert!(engine.invocations().await[0]
            .args
            .contains(&"8223k".to_string()));
        assert!(engine.probed().await.is_empty());
    }
}
