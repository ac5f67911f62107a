//! Types for the profile module.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Video codec reported for profiles that do not name one.
pub const DEFAULT_VIDEO_CODEC: &str = "h264";
/// Audio codec reported for profiles that do not name one.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Extension used when neither the profile nor its name implies one.
pub const DEFAULT_EXTENSION: &str = ".mp4";

/// Flags that only affect the audio stream. Dropped from first passes.
const AUDIO_FLAGS: &[&str] = &["-c:a", "-b:a", "-acodec", "-ab", "-ar", "-ac"];

/// Raw key/value entries of a profile, in declaration order.
///
/// Deserializes from any map whose values are strings, integers, floats or
/// booleans. Order is whatever the deserializer presents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawProfile(pub Vec<(String, String)>);

impl RawProfile {
    pub fn new<K: Into<String>, V: Into<String>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.0
    }

    /// Value of the first entry named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl<'de> Deserialize<'de> for RawProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawProfile;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of profile settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, RawValue>()? {
                    entries.push((key, value.to_string()));
                }
                Ok(RawProfile(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// A concrete transcoding target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionProfile {
    /// Profile name, used to pick the pass strategy.
    pub name: String,
    /// Video codec the profile asks for.
    pub video_codec: String,
    /// Audio codec the profile asks for.
    pub audio_codec: String,
    /// Video bitrate (e.g. `5000k`).
    pub video_bitrate: Option<String>,
    /// Audio bitrate (e.g. `320k`).
    pub audio_bitrate: Option<String>,
    /// Engine flags in invocation order. Codec and bitrate flags come last.
    pub extra_args: Vec<(String, String)>,
    /// Output extension, always with a leading `.`.
    pub output_extension: String,
    /// Container format passed to `-f`, derived from the extension.
    pub container_format: String,
}

impl ConversionProfile {
    /// Builds a profile from raw entries.
    ///
    /// `ext`, `video`, `audio`, `kvideo` and `kaudio` are recognized; every
    /// other key becomes `-<key> <value>` in declaration order. Recognized
    /// codec settings are appended last as `-c:v`, `-b:v`, `-c:a`, `-b:a`.
    pub fn from_entries(name: &str, entries: &[(String, String)]) -> Self {
        let mut extra_args = Vec::new();
        let mut extension = None;
        let mut video_codec = None;
        let mut audio_codec = None;
        let mut video_bitrate = None;
        let mut audio_bitrate = None;

        for (key, value) in entries {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let key = key.trim().to_lowercase();
            match key.as_str() {
                "ext" => extension = Some(value.to_string()),
                "video" => video_codec = Some(value.to_string()),
                "audio" => audio_codec = Some(value.to_string()),
                "kvideo" => video_bitrate = Some(value.to_string()),
                "kaudio" => audio_bitrate = Some(value.to_string()),
                _ => extra_args.push((format!("-{}", key), value.to_string())),
            }
        }

        if let Some(codec) = &video_codec {
            extra_args.push(("-c:v".to_string(), codec.clone()));
        }
        if let Some(bitrate) = &video_bitrate {
            extra_args.push(("-b:v".to_string(), bitrate.clone()));
        }
        if let Some(codec) = &audio_codec {
            extra_args.push(("-c:a".to_string(), codec.clone()));
        }
        if let Some(bitrate) = &audio_bitrate {
            extra_args.push(("-b:a".to_string(), bitrate.clone()));
        }

        let output_extension = match extension {
            Some(ext) => normalize_extension(&ext),
            None => default_extension_for(name).to_string(),
        };
        let container_format = container_format_for(&output_extension);

        Self {
            name: name.to_string(),
            video_codec: video_codec.unwrap_or_else(|| DEFAULT_VIDEO_CODEC.to_string()),
            audio_codec: audio_codec.unwrap_or_else(|| DEFAULT_AUDIO_CODEC.to_string()),
            video_bitrate,
            audio_bitrate,
            extra_args,
            output_extension,
            container_format,
        }
    }

    /// The fallback profile for names nobody defines.
    pub fn generic(name: &str) -> Self {
        Self {
            name: name.to_string(),
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            video_bitrate: None,
            audio_bitrate: None,
            extra_args: Vec::new(),
            output_extension: DEFAULT_EXTENSION.to_string(),
            container_format: container_format_for(DEFAULT_EXTENSION),
        }
    }

    /// All flags, flattened for the engine.
    pub fn codec_args(&self) -> Vec<String> {
        flatten(self.extra_args.iter())
    }

    /// Flags without the audio settings, for analysis passes that drop audio.
    pub fn video_args(&self) -> Vec<String> {
        flatten(
            self.extra_args
                .iter()
                .filter(|(flag, _)| !AUDIO_FLAGS.contains(&flag.as_str())),
        )
    }

    /// Flags with the video bitrate forced to `bitrate`.
    ///
    /// An existing `-b:v` is replaced in place; otherwise the flag is inserted
    /// after `-c:v`, or appended when the profile names no video codec.
    pub fn codec_args_with_video_bitrate(&self, bitrate: &str) -> Vec<String> {
        let mut args = self.extra_args.clone();
        if let Some(entry) = args.iter_mut().find(|(flag, _)| flag == "-b:v") {
            entry.1 = bitrate.to_string();
        } else {
            let at = args
                .iter()
                .position(|(flag, _)| flag == "-c:v")
                .map(|i| i + 1)
                .unwrap_or(args.len());
            args.insert(at, ("-b:v".to_string(), bitrate.to_string()));
        }
        flatten(args.iter())
    }
}

fn flatten<'a>(pairs: impl Iterator<Item = &'a (String, String)>) -> Vec<String> {
    pairs
        .flat_map(|(flag, value)| [flag.clone(), value.clone()])
        .collect()
}

/// Ensures the extension starts with `.`.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Maps an output extension to the engine's container format name.
pub fn container_format_for(extension: &str) -> String {
    let ext = normalize_extension(extension).to_lowercase();
    match ext.as_str() {
        ".mkv" => "matroska".to_string(),
        ".mp4" => "mp4".to_string(),
        ".webm" => "webm".to_string(),
        other => other.trim_start_matches('.').to_string(),
    }
}

/// Extension implied by a profile name when none is configured.
pub fn default_extension_for(name: &str) -> &'static str {
    match name {
        "plex" | "alta" | "media" | "baja" => ".mkv",
        "movil" | "youtube" => ".mp4",
        "av1" => ".webm",
        _ => DEFAULT_EXTENSION,
    }
}
