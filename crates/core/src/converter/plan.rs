//! Pass planning: turning a profile into engine argument lists.

use std::path::Path;

use super::config::ConverterConfig;
use super::types::{ConversionJob, PassPlan};
use crate::profile::ConversionProfile;

/// Size the `telegram` profile aims for, in bytes.
pub const TELEGRAM_TARGET_BYTES: f64 = 3.5 * 1024.0 * 1024.0 * 1024.0;
/// Audio bitrate reserved by the `telegram` size target, in bits per second.
pub const TELEGRAM_AUDIO_BPS: f64 = 128_000.0;
/// Lowest video bitrate the size target may pick, in kbps.
pub const TELEGRAM_MIN_KBPS: u64 = 1000;
/// Video bitrate used when the input duration is unknown, in kbps.
pub const TELEGRAM_FALLBACK_KBPS: u64 = 2500;

/// How a profile is turned into engine invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStrategy {
    /// One pass with the video bitrate computed from the input duration.
    SizeTargeted,
    /// Analysis pass without audio, then the encoding pass.
    TwoPass,
    /// One pass with the profile settings.
    SinglePass,
    /// One pass with the profile's own flags only.
    Generic,
}

impl PlanStrategy {
    /// Picks the strategy for a profile name.
    pub fn for_profile(name: &str) -> Self {
        match name {
            "telegram" => Self::SizeTargeted,
            "plex" | "alta" | "media" | "baja" | "av1" => Self::TwoPass,
            "movil" | "youtube" => Self::SinglePass,
            _ => Self::Generic,
        }
    }

    /// Whether the input duration is needed to plan.
    pub fn needs_duration(&self) -> bool {
        matches!(self, Self::SizeTargeted)
    }
}

/// Whether hardware acceleration is used for a profile name.
pub fn uses_hwaccel(name: &str) -> bool {
    matches!(
        name,
        "telegram" | "plex" | "alta" | "media" | "baja" | "movil" | "youtube"
    )
}

/// Video bitrate in kbps that keeps the output under the `telegram` target.
///
/// A zero or negative duration means unknown and yields the fallback rate.
pub fn telegram_video_bitrate_kbps(duration_secs: f64) -> u64 {
    if duration_secs <= 0.0 || !duration_secs.is_finite() {
        return TELEGRAM_FALLBACK_KBPS;
    }
    let kbps = (TELEGRAM_TARGET_BYTES * 8.0 / duration_secs - TELEGRAM_AUDIO_BPS) / 1000.0;
    if kbps < TELEGRAM_MIN_KBPS as f64 {
        TELEGRAM_MIN_KBPS
    } else {
        kbps as u64
    }
}

/// Builds the pass plan for converting `input` to `output` with `profile`.
///
/// `duration_secs` is only read by the size-targeted strategy.
pub fn build_plan(
    profile: &ConversionProfile,
    input: &Path,
    output: &Path,
    duration_secs: f64,
    config: &ConverterConfig,
) -> PassPlan {
    let strategy = PlanStrategy::for_profile(&profile.name);
    let hwaccel = if uses_hwaccel(&profile.name) {
        config.hwaccel()
    } else {
        None
    };

    let head = |overwrite: bool| {
        let mut args = Vec::new();
        if overwrite {
            args.push("-y".to_string());
        }
        if let Some(accel) = hwaccel {
            args.extend(["-hwaccel".to_string(), accel.to_string()]);
        }
        args.extend(["-i".to_string(), path_arg(input)]);
        args
    };

    let tail = |args: &mut Vec<String>| {
        args.extend([
            "-f".to_string(),
            profile.container_format.clone(),
            path_arg(output),
        ]);
    };

    match strategy {
        PlanStrategy::SizeTargeted => {
            let kbps = telegram_video_bitrate_kbps(duration_secs);
            let mut args = head(config.overwrite);
            args.extend(profile.codec_args_with_video_bitrate(&format!("{}k", kbps)));
            tail(&mut args);
            PassPlan::SinglePass(args)
        }
        PlanStrategy::TwoPass => {
            let mut first = head(true);
            first.extend(profile.video_args());
            first.extend([
                "-pass".to_string(),
                "1".to_string(),
                "-an".to_string(),
                "-f".to_string(),
                "null".to_string(),
                path_arg(&config.null_sink),
            ]);

            let mut second = head(config.overwrite);
            second.extend(profile.codec_args());
            second.extend(["-pass".to_string(), "2".to_string()]);
            tail(&mut second);
            PassPlan::TwoPass(first, second)
        }
        PlanStrategy::SinglePass | PlanStrategy::Generic => {
            let mut args = head(config.overwrite);
            args.extend(profile.codec_args());
            tail(&mut args);
            PassPlan::SinglePass(args)
        }
    }
}

/// Plans a complete job.
pub fn build_job(
    input: &Path,
    profile: ConversionProfile,
    output: &Path,
    duration_secs: f64,
    config: &ConverterConfig,
) -> ConversionJob {
    let pass_plan = build_plan(&profile, input, output, duration_secs, config);
    ConversionJob {
        input_path: input.to_path_buf(),
        profile,
        output_path: output.to_path_buf(),
        pass_plan,
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
