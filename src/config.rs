//! Host configuration using Figment.
//!
//! Configuration is loaded from:
//! 1. `config/suite_host.toml` (or an explicit path)
//! 2. Environment variables prefixed with `SUITE_HOST_`, split on `__`
//!
//! Every field has a default, so a missing or empty file is a valid
//! configuration.
//!
//! # Example
//! ```no_run
//! use suite_host::config::HostConfig;
//!
//! let config = HostConfig::load()?;
//! config.validate()?;
//! println!("log level: {}", config.logging.level);
//! # Ok::<(), suite_host::HostError>(())
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HostError, HostResult};
use crate::tracing_setup::OutputFormat;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/suite_host.toml";

/// Prefix of environment overrides, e.g. `SUITE_HOST_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "SUITE_HOST_";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level host configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub logging: LoggingConfig,
    pub memory: MemoryConfig,
    pub persistence: PersistenceConfig,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub level: String,
    pub format: OutputFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: OutputFormat::default(),
        }
    }
}

/// Memory handed to plugins through the Handle and Buffer suites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Total bytes plugins may hold at once; unlimited when absent.
    pub budget: Option<usize>,
    /// Fixed answer to the Buffer suite's space query. When absent the
    /// remainder of the budget is reported.
    pub space: Option<i32>,
}

/// Where persisted plugin settings live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub dir: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            dir: default_settings_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_settings_dir() -> PathBuf {
    PathBuf::from("settings")
}

impl HostConfig {
    /// Load configuration from the default file and environment variables.
    pub fn load() -> HostResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file is not an error; the defaults and the environment
    /// still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> HostResult<Self> {
        Ok(Figment::from(Serialized::defaults(HostConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?)
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> HostResult<()> {
        let level = self.logging.level.to_lowercase();
        if !VALID_LEVELS.contains(&level.as_str()) {
            return Err(HostError::Validation(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        if self.memory.budget == Some(0) {
            return Err(HostError::Validation(
                "memory.budget must be greater than zero".to_string(),
            ));
        }

        if matches!(self.memory.space, Some(space) if space < 0) {
            return Err(HostError::Validation(format!(
                "Invalid memory.space {}. Must not be negative",
                self.memory.space.unwrap_or_default()
            )));
        }

        Ok(())
    }

    /// Effective configuration as TOML.
    pub fn to_toml(&self) -> HostResult<String> {
        toml::to_string_pretty(self).map_err(|e| HostError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HostConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.memory.budget, None);
        assert_eq!(config.persistence.dir, PathBuf::from("settings"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_sections_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.toml");
        fs::write(
            &path,
            r#"
[logging]
level = "debug"
format = "json"

[memory]
budget = 65536
"#,
        )
        .unwrap();

        let config = HostConfig::load_from(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, OutputFormat::Json);
        assert_eq!(config.memory.budget, Some(65536));
        assert_eq!(config.memory.space, None);
        assert_eq!(config.persistence, PersistenceConfig::default());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = HostConfig::default();
        config.logging.level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid logging.level 'loud'"));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let mut config = HostConfig::default();
        config.memory.budget = Some(0);
        assert!(matches!(config.validate(), Err(HostError::Validation(_))));

        config.memory.budget = Some(1);
        config.memory.space = Some(-5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_toml_round_trips_through_figment() {
        let mut config = HostConfig::default();
        config.memory.space = Some(4096);
        let text = config.to_toml().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("written.toml");
        fs::write(&path, text).unwrap();
        assert_eq!(HostConfig::load_from(&path).unwrap(), config);
    }
}
