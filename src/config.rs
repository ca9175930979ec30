//! Checker configuration.
//!
//! Options can be embedded in a host's own (serde) configuration, or read from
//! the environment with [`CheckOptions::from_env`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Env var controlling [`CheckOptions::collapse_repeats`].
pub const COLLAPSE_REPEATS_VAR: &str = "DEFERRED_AUDIT_COLLAPSE_REPEATS";

/// Env var controlling [`CheckOptions::track_shared`].
pub const TRACK_SHARED_VAR: &str = "DEFERRED_AUDIT_TRACK_SHARED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    /// Skip pushing a trail frame identical to the most recent one.
    ///
    /// Keeps trails for homogeneous recursive types short, at the cost of
    /// position information inside long uniform chains.
    pub collapse_repeats: bool,

    /// Visit shared cells (`Rc`, `Arc`) once during deep inspection.
    ///
    /// Required for termination on reference cycles.
    pub track_shared: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            collapse_repeats: true,
            track_shared: true,
        }
    }
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collapse_repeats(mut self, collapse: bool) -> Self {
        self.collapse_repeats = collapse;
        self
    }

    pub fn with_track_shared(mut self, track: bool) -> Self {
        self.track_shared = track;
        self
    }

    /// Defaults, overridden by `DEFERRED_AUDIT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns per variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(value) = lookup(COLLAPSE_REPEATS_VAR) {
            options.collapse_repeats = parse_bool(COLLAPSE_REPEATS_VAR, &value)?;
        }
        if let Some(value) = lookup(TRACK_SHARED_VAR) {
            options.track_shared = parse_bool(TRACK_SHARED_VAR, &value)?;
        }
        Ok(options)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
