//! Profile module for named transcoding targets.
//!
//! A profile bundles codec, bitrate and container choices under a name such as
//! `plex` or `telegram`. Built-in profiles can be overridden, and new ones
//! added, through the `[profiles.<name>]` tables of the configuration file.

mod builtin;
mod resolver;
mod types;

pub use builtin::{builtin_profile, is_builtin, BUILTIN_PROFILES};
pub use resolver::ProfileResolver;
pub use types::{
    container_format_for, default_extension_for, normalize_extension, ConversionProfile,
    RawProfile, DEFAULT_AUDIO_CODEC, DEFAULT_EXTENSION, DEFAULT_VIDEO_CODEC,
};
