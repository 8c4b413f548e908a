//! Process-wide configuration

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of errors kept for cause recovery
pub const DEFAULT_REGISTRY_CAPACITY: usize = 100;

/// Default upper bound on captured frames per error
pub const DEFAULT_MAX_FRAMES: usize = 64;

/// Environment variable overriding [`ErrorConfig::registry_capacity`]
pub const ENV_REGISTRY_CAPACITY: &str = "CTXERR_REGISTRY_CAPACITY";

/// Environment variable overriding [`ErrorConfig::max_frames`]
pub const ENV_MAX_FRAMES: &str = "CTXERR_MAX_FRAMES";

static CONFIG: OnceCell<ErrorConfig> = OnceCell::new();

/// Tunables for error creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorConfig {
    /// How many recently created errors stay recoverable as structured causes
    pub registry_capacity: usize,
    /// Maximum number of frames captured per error
    pub max_frames: usize,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            registry_capacity: DEFAULT_REGISTRY_CAPACITY,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value was out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// [`configure`] was called after the configuration was already in use
    #[error("configuration already initialized")]
    AlreadyInitialized,

    /// An environment variable could not be parsed
    #[error("failed to parse {var}={value:?}: {source}")]
    Parse {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Parse failure
        #[source]
        source: std::num::ParseIntError,
    },
}

impl ErrorConfig {
    /// Set the registry capacity
    #[must_use]
    pub fn with_registry_capacity(mut self, capacity: usize) -> Self {
        self.registry_capacity = capacity;
        self
    }

    /// Set the frame limit
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Read overrides from `CTXERR_*` environment variables on top of the defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but unparseable or zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(capacity) = parse_var(ENV_REGISTRY_CAPACITY, &lookup)? {
            config.registry_capacity = capacity;
        }
        if let Some(max_frames) = parse_var(ENV_MAX_FRAMES, &lookup)? {
            config.max_frames = max_frames;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero capacities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "registry_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_frames == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<usize>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|source| ConfigError::Parse { var, value, source })
}

/// Install the configuration used by every subsequently created error.
///
/// Must run before the first error is created.
///
/// # Errors
///
/// Fails if the configuration is invalid or one is already in effect.
pub fn configure(config: ErrorConfig) -> Result<(), ConfigError> {
    config.validate()?;
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// The configuration in effect, loading it from the environment on first use
pub fn config() -> &'static ErrorConfig {
    CONFIG.get_or_init(|| {
        ErrorConfig::from_env().unwrap_or_else(|e| {
            log::warn!("ignoring ctxerr environment configuration: {e}");
            ErrorConfig::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ErrorConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ErrorConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ErrorConfig::from_lookup(lookup_from(&[
            (ENV_REGISTRY_CAPACITY, " 250 "),
            (ENV_MAX_FRAMES, "8"),
        ]))
        .unwrap();
        assert_eq!(config.registry_capacity, 250);
        assert_eq!(config.max_frames, 8);
    }

    #[test]
    fn unparseable_value_is_reported() {
        let err = ErrorConfig::from_lookup(lookup_from(&[(ENV_MAX_FRAMES, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { var: ENV_MAX_FRAMES, .. }));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err =
            ErrorConfig::from_lookup(lookup_from(&[(ENV_REGISTRY_CAPACITY, "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "registry_capacity",
                ..
            }
        ));
        assert!(ErrorConfig::default().with_max_frames(0).validate().is_err());
    }
}
