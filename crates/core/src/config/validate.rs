use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - A default profile is named
/// - Tool paths are not empty
/// - Notifications have Telegram credentials to use
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.mediacraft.default_profile.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "mediacraft.default_profile cannot be empty".to_string(),
        ));
    }

    let tools = [
        ("converter.ffmpeg_path", &config.converter.ffmpeg_path),
        ("converter.ffprobe_path", &config.converter.ffprobe_path),
        ("extractor.tool_path", &config.extractor.tool_path),
    ];
    for (key, path) in tools {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                key
            )));
        }
    }

    if config.mediacraft.notifications && config.telegram.credentials().is_none() {
        return Err(ConfigError::ValidationError(
            "mediacraft.notifications requires telegram.token and telegram.chat_id".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_default_profile_fails() {
        let mut config = Config::default();
        config.mediacraft.default_profile = " ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_tool_path_fails() {
        let mut config = Config::default();
        config.extractor.tool_path = PathBuf::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("extractor.tool_path"));
    }

    #[test]
    fn test_validate_notifications_need_credentials() {
        let mut config = Config::default();
        config.mediacraft.notifications = true;
        assert!(validate_config(&config).is_err());

        config.telegram.token = Some("123:abc".to_string());
        config.telegram.chat_id = Some("42".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
