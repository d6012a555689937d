//! Log output for the host.
//!
//! The suite tables emit `tracing` events (handle creation and release at
//! `debug`, contract violations at `warn`, suite acquisition at `info`). This
//! module installs the subscriber that renders them:
//! - `EnvFilter` with `RUST_LOG` taking precedence over the configured level
//! - pretty, compact or JSON formatting, always on stderr so that command
//!   output on stdout stays machine readable
//!
//! # Example
//! ```no_run
//! use suite_host::{config::HostConfig, tracing_setup};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HostConfig::load()?;
//! tracing_setup::init_from_config(&config)?;
//! tracing::info!("host ready");
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

use crate::config::HostConfig;
use crate::error::{HostError, HostResult};

/// Output format for log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Multi-line, colored (for development)
    #[default]
    Pretty,
    /// One line per event, no colors
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Initialize logging from the `[logging]` section.
pub fn init_from_config(config: &HostConfig) -> HostResult<()> {
    init(parse_log_level(&config.logging.level)?, config.logging.format)
}

/// Install the global subscriber.
///
/// Idempotent: if a global subscriber is already set (another test, or an
/// embedding application) this returns `Ok(())` and leaves it in place.
pub fn init(level: Level, format: OutputFormat) -> HostResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let base = fmt::layer().with_writer(std::io::stderr);
    let layer = match format {
        OutputFormat::Pretty => base.pretty().with_filter(env_filter).boxed(),
        OutputFormat::Compact => base.compact().with_ansi(false).with_filter(env_filter).boxed(),
        OutputFormat::Json => base.json().with_ansi(false).with_filter(env_filter).boxed(),
    };

    tolerate_existing(tracing_subscriber::registry().with(layer).try_init())
}

fn tolerate_existing(result: Result<(), TryInitError>) -> HostResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.to_string().contains("global default trace dispatcher has already been set") => Ok(()),
        Err(e) => Err(HostError::Tracing(e.to_string())),
    }
}

/// Parse a level name, case-insensitively.
pub fn parse_log_level(level: &str) -> HostResult<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(HostError::Validation(format!(
            "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
            level
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
        assert_eq!(parse_log_level("Error").unwrap(), Level::ERROR);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn test_init_twice_is_ok() {
        let mut host = HostConfig::default();
        host.logging.level = "warn".into();
        host.logging.format = OutputFormat::Compact;
        assert!(init_from_config(&host).is_ok());
        assert!(init(Level::DEBUG, OutputFormat::Json).is_ok());

        host.logging.level = "verbose".into();
        assert!(matches!(init_from_config(&host), Err(HostError::Validation(_))));
    }
}
