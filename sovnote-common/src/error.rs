//! Common error types for SovNote

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for SovNote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SovNote microservices
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config file exists but could not be parsed
    #[error("Failed to parse config file {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
