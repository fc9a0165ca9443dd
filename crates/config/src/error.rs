//! Typed error type for the config crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        reason: String,
    },

    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}
