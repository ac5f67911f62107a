//! FFmpeg-based engine implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::progress::scan_stream;
use super::traits::Engine;
use super::types::ProgressSample;

/// Engine that shells out to `ffmpeg` and `ffprobe`.
pub struct FfmpegEngine {
    config: ConverterConfig,
}

impl FfmpegEngine {
    /// Creates a new FFmpeg engine with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    fn probe_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }
}

/// Parses the single-value probe output.
fn parse_duration(output: &str) -> Result<f64, ConverterError> {
    let text = output.trim();
    text.parse::<f64>()
        .map_err(|e| ConverterError::probe_failed(format!("unexpected duration '{}': {}", text, e)))
}

#[async_trait]
impl Engine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn run_pass(
        &self,
        pass: u8,
        args: &[String],
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<Option<ProgressSample>, ConverterError> {
        debug!(
            "Running pass {}: {} {}",
            pass,
            self.config.ffmpeg_path.display(),
            args.join(" ")
        );

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ConverterError::ffmpeg_launch(self.config.ffmpeg_path.clone(), e))?;

        let outcome = match child.stderr.take() {
            Some(stderr) => scan_stream(stderr, &progress_tx).await,
            None => Default::default(),
        };

        let status = child.wait().await?;
        if !status.success() {
            return Err(ConverterError::pass_failed(
                pass,
                status.code(),
                outcome.stderr(),
            ));
        }

        Ok(outcome.last)
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, ConverterError> {
        let output = Command::new(&self.config.ffprobe_path)
            .args(Self::probe_args(path))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ConverterError::ffprobe_launch(self.config.ffprobe_path.clone(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConverterError::probe_failed(format!(
                "ffprobe exited with code {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3600.250000\n").unwrap(), 3600.25);
        assert!(matches!(
            parse_duration("N/A"),
            Err(ConverterError::ProbeFailed { .. })
        ));
    }

    #[test]
    fn test_probe_args() {
        let args = FfmpegEngine::probe_args(Path::new("movie.mkv"));
        assert_eq!(
            args,
            vec![
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                "movie.mkv"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let engine = FfmpegEngine::new(ConverterConfig::with_paths(
            PathBuf::from("/nonexistent/ffmpeg"),
            PathBuf::from("/nonexistent/ffprobe"),
        ));
        let (tx, _rx) = mpsc::channel(1);

        let err = engine.run_pass(1, &[], tx).await.unwrap_err();
        assert!(matches!(err, ConverterError::FfmpegNotFound { .. }));

        let err = engine
            .probe_duration(Path::new("movie.mkv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConverterError::FfprobeNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_pass_reports_progress() {
        let bin = TempDir::new().unwrap();
        let ffmpeg = write_script(
            bin.path(),
            "ffmpeg",
            r#"printf 'frame=1 time=00:00:01.00 speed=1x\r' >&2
printf 'frame=2 time=00:00:02.00 speed=1x\r' >&2"#,
        );
        let engine = FfmpegEngine::new(ConverterConfig::with_paths(ffmpeg, PathBuf::from("ffprobe")));
        let (tx, mut rx) = mpsc::channel(8);

        let last = engine.run_pass(1, &["-i".to_string()], tx).await.unwrap();

        assert_eq!(last, Some(ProgressSample::new("00:00:02.00")));
        assert_eq!(rx.recv().await, Some(ProgressSample::new("00:00:01.00")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_pass_failure() {
        let bin = TempDir::new().unwrap();
        let ffmpeg = write_script(
            bin.path(),
            "ffmpeg",
            "echo 'Error while decoding stream' >&2\nexit 3",
        );
        let engine = FfmpegEngine::new(ConverterConfig::with_paths(ffmpeg, PathBuf::from("ffprobe")));
        let (tx, _rx) = mpsc::channel(8);

        let err = engine.run_pass(2, &[], tx).await.unwrap_err();
        match err {
            ConverterError::PassFailed { pass, code, stderr } => {
                assert_eq!(pass, 2);
                assert_eq!(code, Some(3));
                assert_eq!(stderr.as_deref(), Some("Error while decoding stream"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_duration() {
        let bin = TempDir::new().unwrap();
        let ffprobe = write_script(bin.path(), "ffprobe", "echo 42.5");
        let engine = FfmpegEngine::new(ConverterConfig::with_paths(PathBuf::from("ffmpeg"), ffprobe));

        let duration = engine.probe_duration(Path::new("movie.mkv")).await.unwrap();
        assert_eq!(duration, 42.5);
    }
}
