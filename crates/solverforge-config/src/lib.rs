//! Configuration system for SolverForge sessions.
//!
//! Load session configuration from TOML or YAML to switch consistency
//! assertions on without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use solverforge_config::{EnvironmentMode, SessionConfig};
//!
//! let config = SessionConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!     fact_capacity = 1024
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.fact_capacity, Some(1024));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use solverforge_config::SessionConfig;
//!
//! let config = SessionConfig::load("session.toml").unwrap_or_default();
//! assert!(!config.environment_mode.is_asserting());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration of a single propagation session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    /// Environment mode deciding which consistency checks run per mutation.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Number of fact slots to reserve up front.
    #[serde(default)]
    pub fact_capacity: Option<usize>,
}

impl SessionConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Reserves fact slots up front.
    pub fn with_fact_capacity(mut self, capacity: usize) -> Self {
        self.fact_capacity = Some(capacity);
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.fact_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "fact_capacity must be positive when set".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Environment mode deciding how much a session checks itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// No consistency checks.
    #[default]
    NoAssert,

    /// After each mutation, the global score must equal the sum of the
    /// per-constraint totals.
    FastAssert,

    /// After each mutation, the incremental score is compared against a
    /// from-scratch evaluation of the live facts.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true if any per-mutation check runs.
    pub fn is_asserting(self) -> bool {
        !matches!(self, EnvironmentMode::NoAssert)
    }

    /// Returns true if every mutation is verified against a full recomputation.
    pub fn is_full_assert(self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

#[cfg(test)]
mod tests;
