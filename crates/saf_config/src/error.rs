//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file {name} not found (looked in {local} and {default})")]
    NotFound {
        name: String,
        local: PathBuf,
        default: PathBuf,
    },

    #[error("Failed to read configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Invalid value '{value}' for [{section}] {key}: expected an integer")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("Cannot determine installation root: {0}")]
    AppRoot(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;
