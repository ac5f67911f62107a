//! Resolution of profile names into concrete profiles.

use std::collections::BTreeMap;
use tracing::debug;

use super::builtin::{builtin_profile, is_builtin};
use super::types::{ConversionProfile, RawProfile};

/// Resolves profile names against custom and built-in definitions.
///
/// Custom profiles take precedence over built-ins of the same name. Unknown
/// names resolve to [`ConversionProfile::generic`].
#[derive(Debug, Clone, Default)]
pub struct ProfileResolver {
    custom: BTreeMap<String, RawProfile>,
}

impl ProfileResolver {
    /// Creates a resolver over the given custom profiles.
    pub fn new(custom: BTreeMap<String, RawProfile>) -> Self {
        Self { custom }
    }

    /// Creates a resolver that only knows the built-ins.
    pub fn builtin_only() -> Self {
        Self::default()
    }

    /// Whether `name` is a custom or built-in profile.
    pub fn is_known(&self, name: &str) -> bool {
        self.custom.contains_key(name) || is_builtin(name)
    }

    /// Resolves `requested` into a concrete profile.
    pub fn resolve(&self, requested: &str) -> ConversionProfile {
        if let Some(raw) = self.custom.get(requested) {
            debug!("Using custom profile '{}'", requested);
            return ConversionProfile::from_entries(requested, raw.entries());
        }

        if let Some(profile) = builtin_profile(requested) {
            debug!("Using built-in profile '{}'", requested);
            return profile;
        }

        debug!("Profile '{}' is not defined, using generic defaults", requested);
        ConversionProfile::generic(requested)
    }
}
