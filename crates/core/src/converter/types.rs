//! Types for the converter module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::profile::ConversionProfile;

/// Elapsed-time text taken from one engine diagnostic line (`HH:MM:SS[.ff]`).
///
/// Samples are not validated; the display only keeps the most recent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressSample(String);

impl ProgressSample {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgressSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Engine invocations for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassPlan {
    /// One invocation producing the output.
    SinglePass(Vec<String>),
    /// An analysis pass writing to the null sink, then the encoding pass.
    TwoPass(Vec<String>, Vec<String>),
}

impl PassPlan {
    /// Argument lists in execution order, numbered from 1.
    pub fn passes(&self) -> Vec<(u8, &[String])> {
        match self {
            Self::SinglePass(args) => vec![(1, args.as_slice())],
            Self::TwoPass(first, second) => {
                vec![(1, first.as_slice()), (2, second.as_slice())]
            }
        }
    }

    pub fn pass_count(&self) -> usize {
        match self {
            Self::SinglePass(_) => 1,
            Self::TwoPass(_, _) => 2,
        }
    }

    pub fn is_two_pass(&self) -> bool {
        matches!(self, Self::TwoPass(_, _))
    }
}

/// A fully planned conversion. Immutable once built.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input_path: PathBuf,
    pub profile: ConversionProfile,
    pub output_path: PathBuf,
    pub pass_plan: PassPlan,
}

/// Outcome of a completed conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// File that was converted.
    pub input_path: PathBuf,
    /// File that was written.
    pub output_path: PathBuf,
    /// Name of the profile used.
    pub profile_name: String,
    /// Probed duration of the output, 0 when absent or empty.
    pub output_duration_secs: f64,
    /// Last elapsed-time sample reported by the engine.
    pub last_progress_sample: Option<ProgressSample>,
    /// When the final pass finished.
    pub completed_at: DateTime<Utc>,
}

/// Lifecycle of one conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Planning,
    Pass1Running,
    Pass2Running,
    Completed,
    Failed,
}

impl JobState {
    /// State for the given running pass.
    pub fn running(pass: u8) -> Self {
        if pass >= 2 {
            Self::Pass2Running
        } else {
            Self::Pass1Running
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Planning => "planning",
            Self::Pass1Running => "pass1_running",
            Self::Pass2Running => "pass2_running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
