//! Configuration for meta-network bookkeeping.
//!
//! [`NetworkConfig`] bundles the tunables that shape cross-network side
//! effects. Callers build it in code or load it from YAML; every field has a
//! default so a partial file is valid.
//!
//! ```yaml
//! passive_tolerance: 0.0001
//! group_decay_step: 1.0
//! link_members_on_join: false
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::interaction::DEFAULT_PASSIVE_TOLERANCE;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Tunables for interaction bookkeeping and group side effects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkConfig {
    /// Weight below which an interaction counts as passive (default: 0.0001).
    #[serde(default = "default_passive_tolerance")]
    pub passive_tolerance: f64,

    /// Amount an interaction decays per severed shared group (default: 1.0).
    #[serde(default = "default_group_decay_step")]
    pub group_decay_step: f64,

    /// Record a first interaction between a new group member and each
    /// same-class co-member on join (default: false).
    #[serde(default)]
    pub link_members_on_join: bool,
}

const fn default_passive_tolerance() -> f64 {
    DEFAULT_PASSIVE_TOLERANCE
}

const fn default_group_decay_step() -> f64 {
    1.0
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            passive_tolerance: default_passive_tolerance(),
            group_decay_step: default_group_decay_step(),
            link_members_on_join: false,
        }
    }
}

impl NetworkConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("passive_tolerance", self.passive_tolerance)?;
        check_non_negative("group_decay_step", self.group_decay_step)
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite non-negative number, got {value}"),
        })
    }
}
