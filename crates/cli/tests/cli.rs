use std::process::{Command, Output};

use tempfile::TempDir;

/// Run the binary with an isolated home directory.
fn mediacraft(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mediacraft"))
        .args(args)
        .env("HOME", home.path())
        .env("USERPROFILE", home.path())
        .env_remove("MEDIACRAFT_CONFIG")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run mediacraft")
}

#[test]
fn test_no_action_exits_with_error() {
    let home = TempDir::new().unwrap();
    let output = mediacraft(&home, &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    let output = mediacraft(&home, &["-v"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_explicit_config() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("nope.toml");
    let output = mediacraft(
        &home,
        &["--config", config.to_str().unwrap(), "-c", "movie.mkv"],
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_input_fails_request() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("ghost.mkv");
    let output = mediacraft(&home, &["-c", &format!("{}@plex", missing.display())]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_order_sorts_seasons() {
    let home = TempDir::new().unwrap();
    let series = home.path().join("series");
    std::fs::create_dir_all(&series).unwrap();
    std::fs::write(series.join("Show.S02E03.mkv"), b"x").unwrap();

    let output = mediacraft(&home, &["-o", series.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(series.join("Temporada 2/Show.S02E03.mkv").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Season 2: 1 file(s)"));
}
