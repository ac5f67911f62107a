use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::archive::ExtractorConfig;
use crate::converter::ConverterConfig;
use crate::profile::RawProfile;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mediacraft: GeneralConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    /// Custom profiles, keyed by name. Entries keep declaration order.
    #[serde(default)]
    pub profiles: BTreeMap<String, RawProfile>,
}

/// General settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Profile used when a request names none (or an unknown one)
    #[serde(default = "default_profile")]
    pub default_profile: String,
    /// Where outputs are written; the working directory when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Send a Telegram message after each conversion
    #[serde(default)]
    pub notifications: bool,
    /// Folder name prefix used when organizing series by season
    #[serde(default = "default_season_dir_prefix")]
    pub season_dir_prefix: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile(),
            output_dir: None,
            notifications: false,
            season_dir_prefix: default_season_dir_prefix(),
        }
    }
}

fn default_profile() -> String {
    "telegram".to_string()
}

fn default_season_dir_prefix() -> String {
    "Temporada".to_string()
}

/// Telegram bot credentials
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    /// Token and chat id, when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let chat_id = self
            .chat_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())?;
        Some((token, chat_id))
    }
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub mediacraft: GeneralConfig,
    pub telegram: SanitizedTelegramConfig,
    pub converter: ConverterConfig,
    pub extractor: ExtractorConfig,
    pub profiles: Vec<String>,
}

/// Sanitized Telegram config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub token_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            mediacraft: config.mediacraft.clone(),
            telegram: SanitizedTelegramConfig {
                token_configured: config
                    .telegram
                    .token
                    .as_deref()
                    .is_some_and(|t| !t.trim().is_empty()),
                chat_id: config.telegram.chat_id.clone(),
            },
            converter: config.converter.clone(),
            extractor: config.extractor.clone(),
            profiles: config.profiles.keys().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mediacraft.default_profile, "telegram");
        assert_eq!(config.mediacraft.season_dir_prefix, "Temporada");
        assert!(!config.mediacraft.notifications);
        assert!(config.mediacraft.output_dir.is_none());
        assert!(config.profiles.is_empty());
        assert_eq!(config.converter.hwaccel(), Some("cuda"));
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[mediacraft]
default_profile = "plex"
output_dir = "out"
notifications = true

[telegram]
token = "123:abc"
chat_id = "42"

[converter]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
hwaccel = ""

[extractor]
tool_path = "/usr/bin/7za"

[profiles.mine]
ext = "mkv"
video = "libx265"
crf = 22
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.mediacraft.default_profile, "plex");
        assert_eq!(config.mediacraft.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.telegram.credentials(), Some(("123:abc", "42")));
        assert_eq!(config.converter.hwaccel(), None);
        assert_eq!(config.extractor.tool_path, PathBuf::from("/usr/bin/7za"));
        assert_eq!(
            config.profiles["mine"].entries(),
            &[
                ("ext".to_string(), "mkv".to_string()),
                ("video".to_string(), "libx265".to_string()),
                ("crf".to_string(), "22".to_string()),
            ][..]
        );
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let telegram = TelegramConfig {
            token: Some("  ".to_string()),
            chat_id: Some("42".to_string()),
        };
        assert!(telegram.credentials().is_none());
        assert!(TelegramConfig::default().credentials().is_none());
    }

    #[test]
    fn test_sanitized_config() {
        let mut config = Config::default();
        config.telegram.token = Some("secret".to_string());
        config
            .profiles
            .insert("mine".to_string(), RawProfile::new([("crf", "20")]));

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.telegram.token_configured);
        assert_eq!(sanitized.profiles, vec!["mine"]);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret"));
    }
}
