//! Built-in profiles, declared as raw entries.

use super::types::ConversionProfile;

/// Names of every built-in profile.
pub const BUILTIN_PROFILES: &[&str] = &[
    "telegram", "plex", "alta", "media", "baja", "movil", "youtube", "av1",
];

fn entries(name: &str) -> Option<&'static [(&'static str, &'static str)]> {
    let entries: &'static [(&str, &str)] = match name {
        // The video bitrate is computed per input to hit the size limit.
        "telegram" => &[
            ("preset", "slow"),
            ("video", "h264_nvenc"),
            ("audio", "aac"),
            ("kaudio", "128k"),
        ],
        "plex" => &[
            ("preset", "slow"),
            ("video", "hevc_nvenc"),
            ("kvideo", "5000k"),
            ("audio", "aac"),
            ("kaudio", "320k"),
        ],
        "alta" => &[
            ("preset", "slow"),
            ("video", "hevc_nvenc"),
            ("kvideo", "8000k"),
            ("audio", "aac"),
            ("kaudio", "256k"),
        ],
        "media" => &[
            ("preset", "medium"),
            ("video", "hevc_nvenc"),
            ("kvideo", "4000k"),
            ("audio", "aac"),
            ("kaudio", "192k"),
        ],
        "baja" => &[
            ("preset", "fast"),
            ("video", "h264_nvenc"),
            ("kvideo", "1500k"),
            ("audio", "aac"),
            ("kaudio", "128k"),
        ],
        "movil" => &[
            ("preset", "fast"),
            ("vf", "scale=-2:720"),
            ("ac", "2"),
            ("video", "h264_nvenc"),
            ("kvideo", "1200k"),
            ("audio", "aac"),
            ("kaudio", "96k"),
        ],
        "youtube" => &[
            ("preset", "slow"),
            ("pix_fmt", "yuv420p"),
            ("movflags", "+faststart"),
            ("video", "h264_nvenc"),
            ("kvideo", "8000k"),
            ("audio", "aac"),
            ("kaudio", "384k"),
        ],
        "av1" => &[
            ("crf", "30"),
            ("video", "libaom-av1"),
            ("kvideo", "0"),
            ("audio", "libopus"),
            ("kaudio", "128k"),
        ],
        _ => return None,
    };
    Some(entries)
}

/// Looks up a built-in profile by name.
pub fn builtin_profile(name: &str) -> Option<ConversionProfile> {
    let raw: Vec<(String, String)> = entries(name)?
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Some(ConversionProfile::from_entries(name, &raw))
}

/// Whether `name` is a built-in profile.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_PROFILES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_resolves() {
        for name in BUILTIN_PROFILES {
            let profile = builtin_profile(name).unwrap();
            assert_eq!(profile.name, *name);
            assert!(profile.output_extension.starts_with('.'));
        }
        assert!(builtin_profile("unknown").is_none());
    }

    #[test]
    fn test_builtin_extensions() {
        assert_eq!(builtin_profile("plex").unwrap().container_format, "matroska");
        assert_eq!(builtin_profile("telegram").unwrap().output_extension, ".mp4");
        assert_eq!(builtin_profile("youtube").unwrap().output_extension, ".mp4");
        assert_eq!(builtin_profile("av1").unwrap().container_format, "webm");
    }

    #[test]
    fn test_plex_settings() {
        let plex = builtin_profile("plex").unwrap();
        assert_eq!(plex.video_codec, "hevc_nvenc");
        assert_eq!(plex.video_bitrate.as_deref(), Some("5000k"));
        assert_eq!(plex.audio_bitrate.as_deref(), Some("320k"));
    }
}
