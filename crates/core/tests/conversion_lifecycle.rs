//! Conversion lifecycle integration tests.
//!
//! These tests drive the conversion processor with a mock engine:
//! - Request parsing and profile selection
//! - Pass sequencing and abort on failure
//! - Directory and archive inputs
//! - Summaries and notifications

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use mediacraft_core::{
    archive::{Extractor, ExtractorConfig},
    converter::{ConverterConfig, ConverterError, Orchestrator},
    processor::{ConversionProcessor, ProcessorConfig, ProcessorError},
    profile::ProfileResolver,
    testing::{fixtures, MockEngine, MockNotifier},
};

/// Test helper wiring a processor to a mock engine.
struct TestHarness {
    processor: ConversionProcessor<MockEngine>,
    engine: MockEngine,
    source_dir: TempDir,
    output_dir: TempDir,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_extractor(ExtractorConfig::default())
    }

    fn with_extractor(extractor: ExtractorConfig) -> Self {
        let source_dir = TempDir::new().expect("Failed to create source dir");
        let output_dir = TempDir::new().expect("Failed to create output dir");
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let engine = MockEngine::new()
            .with_samples(vec!["00:00:01.00", "00:00:02.00"])
            .with_output_bytes(b"converted".to_vec());

        let converter_config = ConverterConfig::default();
        let processor = ConversionProcessor::new(
            ProcessorConfig::default()
                .with_output_dir(output_dir.path().to_path_buf())
                .with_progress(false),
            Orchestrator::new(engine.clone(), converter_config),
            Extractor::new(extractor.with_temp_dir(temp_dir.path().to_path_buf())),
            ProfileResolver::builtin_only(),
        );

        Self {
            processor,
            engine,
            source_dir,
            output_dir,
            _temp_dir: temp_dir,
        }
    }

    fn request(&self, relative: &str, profile: Option<&str>) -> String {
        let path = self.source_dir.path().join(relative);
        match profile {
            Some(profile) => format!("{}@{}", path.display(), profile),
            None => path.display().to_string(),
        }
    }
}

#[tokio::test]
async fn test_two_pass_profile_end_to_end() {
    let harness = TestHarness::new();
    fixtures::media_file(harness.source_dir.path(), "movie.avi");
    harness.engine.set_duration(5400.0).await;

    let outcome = harness
        .processor
        .process(&harness.request("movie.avi", Some("plex")))
        .await
        .unwrap();

    let invocations = harness.engine.invocations().await;
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].pass, 1);
    assert!(invocations[0].is_analysis());
    assert_eq!(invocations[1].pass, 2);

    let output = harness.output_dir.path().join("movie.mkv");
    assert_eq!(invocations[1].target(), Some(output.to_str().unwrap()));
    assert!(output.exists());

    assert_eq!(outcome.results.len(), 1);
    let result = &outcome.results[0];
    assert_eq!(result.profile_name, "plex");
    assert_eq!(result.output_duration_secs, 5400.0);
    assert_eq!(
        result.last_progress_sample.as_ref().map(|s| s.as_str()),
        Some("00:00:02.00")
    );
    assert_eq!(
        outcome.summaries[0],
        "Resumen: movie.avi → movie.mkv | Perfil: plex | Duración salida: 01:30:00 | Progreso final: 00:00:02.00"
    );
}

#[tokio::test]
async fn test_failed_first_pass_aborts() {
    let harness = TestHarness::new();
    fixtures::media_file(harness.source_dir.path(), "movie.mkv");
    harness.engine.fail_pass(1).await;

    let err = harness
        .processor
        .process(&harness.request("movie.mkv", Some("alta")))
        .await
        .unwrap_err();

    match err {
        ProcessorError::Converter(e) => assert_eq!(e.failed_pass(), Some(1)),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(harness.engine.invocations().await.len(), 1);
}

#[tokio::test]
async fn test_failed_second_pass_reports_pass() {
    let harness = TestHarness::new();
    fixtures::media_file(harness.source_dir.path(), "movie.mkv");
    harness.engine.fail_pass(2).await;

    let err = harness
        .processor
        .process(&harness.request("movie.mkv", Some("baja")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProcessorError::Converter(ConverterError::PassFailed { pass: 2, .. })
    ));
    assert_eq!(harness.engine.invocations().await.len(), 2);
}

#[tokio::test]
async fn test_default_profile_is_size_targeted() {
    let harness = TestHarness::new();
    fixtures::media_file(harness.source_dir.path(), "clip.mkv");
    harness.engine.set_duration(3600.0).await;

    harness
        .processor
        .process(&harness.request("clip.mkv", Some("unknown")))
        .await
        .unwrap();

    let invocations = harness.engine.invocations().await;
    assert_eq!(invocations.len(), 1);
    let args = &invocations[0].args;
    let at = args.iter().position(|a| a == "-b:v").unwrap();
    assert_eq!(args[at + 1], "8223k");
    assert_eq!(
        invocations[0].target(),
        Some(harness.output_dir.path().join("clip.mp4").to_str().unwrap())
    );

    // One probe feeds both the display and the bitrate.
    let input = harness.source_dir.path().join("clip.mkv");
    let probes = harness.engine.probed().await;
    assert_eq!(probes.iter().filter(|p| **p == input).count(), 1);
}

#[tokio::test]
async fn test_directory_input_converts_media_in_order() {
    let harness = TestHarness::new();
    fixtures::media_file(harness.source_dir.path(), "show/b.mkv");
    fixtures::media_file(harness.source_dir.path(), "show/a.mp4");
    fixtures::write_file(harness.source_dir.path(), "show/notes.txt", b"notes");

    let outcome = harness
        .processor
        .process(&harness.request("show", Some("movil")))
        .await
        .unwrap();

    let inputs: Vec<_> = outcome
        .results
        .iter()
        .map(|r| r.input_path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(inputs, vec!["a.mp4", "b.mkv"]);
    assert_eq!(harness.engine.invocations().await.len(), 2);
}

#[tokio::test]
async fn test_directory_without_media() {
    let harness = TestHarness::new();
    fixtures::write_file(harness.source_dir.path(), "docs/readme.txt", b"x");

    let err = harness
        .processor
        .process(&harness.request("docs", None))
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessorError::NoMediaFound(_)));
    assert!(harness.engine.invocations().await.is_empty());
}

#[tokio::test]
async fn test_missing_input() {
    let harness = TestHarness::new();

    let err = harness
        .processor
        .process(&harness.request("ghost.mkv", Some("plex")))
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessorError::InputNotFound(_)));
}

#[cfg(unix)]
fn fake_extraction_tool(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    // Usage: tool x <archive> -o<dest> -y
    let path = dir.join("fake7z");
    std::fs::write(
        &path,
        "#!/bin/sh\ndest=\"${3#-o}\"\nprintf video > \"$dest/episode.mkv\"\nprintf text > \"$dest/info.nfo\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[tokio::test]
async fn test_split_archive_is_joined_and_converted() {
    let tools = TempDir::new().unwrap();
    let harness = TestHarness::with_extractor(
        ExtractorConfig::default().with_tool_path(fake_extraction_tool(tools.path())),
    );
    fixtures::write_file(harness.source_dir.path(), "pack/movie.7z.001", b"first");
    fixtures::write_file(harness.source_dir.path(), "pack/movie.7z.002", b"second");

    let outcome = harness
        .processor
        .process(&harness.request("pack/movie.7z.001", Some("youtube")))
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(
        outcome.results[0].input_path.file_name().unwrap(),
        "episode.mkv"
    );
    assert!(harness.output_dir.path().join("episode.mp4").exists());
}

#[tokio::test]
async fn test_notifications_are_flushed() {
    let notifier = MockNotifier::new();
    let harness = TestHarness::new();
    let processor = harness.processor.with_notifier(Arc::new(notifier.clone()));
    fixtures::media_file(harness.source_dir.path(), "movie.mkv");

    let outcome = processor
        .process(&format!(
            "{}@plex",
            harness.source_dir.path().join("movie.mkv").display()
        ))
        .await
        .unwrap();

    assert_eq!(processor.flush_notifications(Duration::from_secs(5)).await, 1);
    assert_eq!(notifier.messages().await, outcome.summaries);
}
