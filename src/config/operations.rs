//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{LockRelayError, Result};
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LockRelayError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockRelayError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LockRelayError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_timeout_ms` must be positive
    /// - `poll_interval_ms` must be positive
    /// - `hang_probability` must be within `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if self.lock_timeout_ms == 0 {
            return Err(LockRelayError::ConfigError(
                "lock_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(LockRelayError::ConfigError(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.hang_probability) {
            return Err(LockRelayError::ConfigError(format!(
                "hang_probability must be between 0 and 1 (found {})",
                self.hang_probability
            )));
        }

        Ok(())
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn work_max(&self) -> Duration {
        Duration::from_millis(self.work_max_ms)
    }

    pub fn hang(&self) -> Duration {
        Duration::from_millis(self.hang_ms)
    }
}
