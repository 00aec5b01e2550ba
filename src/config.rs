//! Truncation configuration — MaxLength and the ellipsis marker.
//!
//! A [`TruncationConfig`] can only exist in a valid state: the constructor
//! and the serde path both reject a MaxLength that cannot hold the
//! ellipsis.  That keeps the engine total; it never has to re-check the
//! bound per value.
//!
//! The process-wide configuration is set at most once with [`install`].
//! Reading it through [`TruncationConfig::global`] before anything was
//! installed freezes the defaults.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::*;

static GLOBAL: OnceLock<TruncationConfig> = OnceLock::new();

/// Validated truncation bound and marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct TruncationConfig {
    pub(crate) max_length: usize,
    pub(crate) ellipsis: String,
    /// Ellipsis length in chars, cached for the engine.
    #[serde(skip_serializing)]
    pub(crate) ellipsis_chars: usize,
}

impl TruncationConfig {
    /// Build a configuration, failing with `ERR_CONFIG` when `max_length`
    /// is shorter than the ellipsis.
    pub fn new(max_length: usize, ellipsis: impl Into<String>) -> Result<Self, PolicyError> {
        let ellipsis = ellipsis.into();
        let ellipsis_chars = ellipsis.chars().count();
        if max_length < ellipsis_chars {
            return Err(PolicyError::new(
                ERR_CONFIG,
                format!(
                    "max_length {} cannot hold a {}-character ellipsis",
                    max_length, ellipsis_chars
                ),
            ));
        }
        Ok(Self {
            max_length,
            ellipsis,
            ellipsis_chars,
        })
    }

    /// Default ellipsis with a custom bound.
    pub fn with_max_length(max_length: usize) -> Result<Self, PolicyError> {
        Self::new(max_length, ELLIPSIS)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn ellipsis(&self) -> &str {
        &self.ellipsis
    }

    /// The process-wide configuration.
    ///
    /// Returns the installed configuration, or the defaults if nothing has
    /// been installed yet.  In the latter case the defaults become final.
    pub fn global() -> &'static TruncationConfig {
        GLOBAL.get_or_init(TruncationConfig::default)
    }
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            ellipsis: ELLIPSIS.to_string(),
            ellipsis_chars: ELLIPSIS.chars().count(),
        }
    }
}

/// Install the process-wide configuration.
///
/// Call once during startup.  A second call, or a call after
/// [`TruncationConfig::global`] already froze the defaults, fails with
/// `ERR_ALREADY_CONFIGURED`.
pub fn install(config: TruncationConfig) -> Result<(), PolicyError> {
    let max_length = config.max_length;
    GLOBAL.set(config).map_err(|_| {
        PolicyError::new(
            ERR_ALREADY_CONFIGURED,
            "process-wide truncation config already set",
        )
    })?;
    tracing::debug!(max_length, "installed process-wide truncation config");
    Ok(())
}

// ── serde input shape ────────────────────────────────────────
// Missing keys fall back to the defaults; validation happens in the
// TryFrom conversion so a bad config file fails at load time.

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_max_length")]
    max_length: usize,
    #[serde(default = "default_ellipsis")]
    ellipsis: String,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_ellipsis() -> String {
    ELLIPSIS.to_string()
}

impl TryFrom<RawConfig> for TruncationConfig {
    type Error = PolicyError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        TruncationConfig::new(raw.max_length, raw.ellipsis)
    }
}
