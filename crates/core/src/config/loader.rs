use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};
use crate::profile::RawProfile;

/// Prefix of environment overrides, e.g. `MEDIACRAFT_MEDIACRAFT__DEFAULT_PROFILE`.
pub const ENV_PREFIX: &str = "MEDIACRAFT_";

/// Location of the configuration file when none is requested:
/// `$HOME/.config/mediacraft/mediacraft.toml` (`%USERPROFILE%` on Windows).
pub fn default_config_path() -> Option<PathBuf> {
    let home_var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let home = std::env::var_os(home_var).filter(|h| !h.is_empty())?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("mediacraft")
            .join("mediacraft.toml"),
    )
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

    let mut config: Config = Figment::new()
        .merge(Toml::string(&contents))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    restore_profile_order(&mut config, &contents)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults plus any
/// environment overrides.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    Figment::new()
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[derive(Deserialize)]
struct ProfileTables {
    #[serde(default)]
    profiles: BTreeMap<String, RawProfile>,
}

/// Figment hands tables back sorted by key. Profile flags are order
/// sensitive, so entries are re-sorted to match the file.
fn restore_profile_order(config: &mut Config, contents: &str) -> Result<(), ConfigError> {
    let file: ProfileTables =
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    for (name, declared) in &file.profiles {
        if let Some(merged) = config.profiles.get_mut(name) {
            *merged = reorder(merged, declared);
        }
    }
    Ok(())
}

/// Entries of `merged` in the order of `declared`, followed by the keys only
/// `merged` has.
fn reorder(merged: &RawProfile, declared: &RawProfile) -> RawProfile {
    let mut entries: Vec<(String, String)> = declared
        .entries()
        .iter()
        .filter_map(|(key, _)| merged.get(key).map(|v| (key.clone(), v.to_string())))
        .collect();

    for (key, value) in merged.entries() {
        if declared.get(key).is_none() {
            entries.push((key.clone(), value.clone()));
        }
    }
    RawProfile(entries)
}
