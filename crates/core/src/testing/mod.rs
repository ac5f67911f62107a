//! Testing utilities and mock implementations.
//!
//! The mock engine stands in for `ffmpeg` and the mock notifier for the
//! Telegram endpoint, so conversion flows can be exercised offline.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediacraft_core::testing::MockEngine;
//!
//! let engine = MockEngine::new().with_samples(vec!["00:00:01.00"]);
//! engine.set_duration(3600.0).await;
//!
//! // Hand a clone to the orchestrator, keep this one for assertions.
//! let passes = engine.invocations().await;
//! ```

mod mock_engine;
mod mock_notifier;

pub use mock_engine::{EngineInvocation, MockEngine};
pub use mock_notifier::MockNotifier;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Create a file with the given contents, creating parent directories.
    pub fn write_file(dir: &Path, relative: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Create a fake media file.
    pub fn media_file(dir: &Path, name: &str) -> PathBuf {
        write_file(dir, name, b"not really video")
    }

}
