//! Error types for the host side of the crate.
//!
//! Suite calls report [`SuiteError`] values that map onto plugin status
//! codes. Everything the host does outside a suite call (loading
//! configuration, reading or writing settings files, starting the logger)
//! reports a [`HostError`], which wraps the lower-level errors with `#[from]`
//! so `?` works throughout.

use suite_api::SuiteAcquireError;
use suite_core::SuiteError;
use thiserror::Error;

use crate::persist::PersistError;

/// Convenience alias for results using the host error type.
pub type HostResult<T> = std::result::Result<T, HostError>;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Persist(#[from] PersistError),

    #[error("Suite call failed: {0}")]
    Suite(#[from] SuiteError),

    #[error("Suite acquisition failed: {0}")]
    Acquire(#[from] SuiteAcquireError),

    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}

impl From<figment::Error> for HostError {
    fn from(err: figment::Error) -> Self {
        HostError::Config(Box::new(err))
    }
}

impl HostError {
    /// Status code to report when this error crosses into a plugin.
    pub fn status(&self) -> suite_core::SPErr {
        match self {
            HostError::Suite(err) => err.code(),
            HostError::Acquire(err) => SuiteError::from(err.clone()).code(),
            HostError::Io(err) if err.kind() == std::io::ErrorKind::OutOfMemory => {
                SuiteError::OutOfMemory.code()
            }
            _ => SuiteError::BadParameter.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_wrapped_errors() {
        assert_eq!(
            HostError::from(SuiteError::OutOfMemory).status(),
            SuiteError::OutOfMemory.code()
        );
        let acquire = SuiteAcquireError::NotFound("Nope Suite".into());
        assert_eq!(
            HostError::from(acquire).status(),
            SuiteError::SuiteNotFound.code()
        );
    }

    #[test]
    fn test_display_carries_context() {
        let err = HostError::Validation("logging.level must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Configuration validation error: logging.level must not be empty"
        );
    }
}
