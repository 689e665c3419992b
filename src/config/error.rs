//! Configuration error types for loading and parsing config files.
//!
//! These never reach the caller of the resolver: each one is logged and the
//! candidate is treated as absent.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::format::ConfigFormat;

/// Errors that can occur when loading a single configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// Path that was probed.
        path: PathBuf,
    },

    /// Failed to read the configuration file from disk.
    #[error("Failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The content could not be parsed.
    #[error("Invalid {format} configuration at {path}:{line}:{column}: {message}")]
    ParseError {
        /// Path to the file containing the error.
        path: PathBuf,
        /// Format the file was parsed as.
        format: ConfigFormat,
        /// One-based line index of the error (0 if unknown).
        line: usize,
        /// One-based column index of the error (0 if unknown).
        column: usize,
        /// Human-readable description of the parse failure.
        message: String,
    },

    /// The file parsed, but its top level is not a mapping.
    #[error("{format} configuration at {path} is not a mapping")]
    NotAMapping {
        /// Path to the offending file.
        path: PathBuf,
        /// Format the file was parsed as.
        format: ConfigFormat,
    },

    /// The extension is not one of `.yaml`, `.yml`, `.json`, `.toml`.
    #[error("Unsupported configuration file extension: {path}")]
    UnsupportedFormat {
        /// Path with the unrecognised extension.
        path: PathBuf,
    },

    /// YAML support was compiled out.
    #[error("YAML support is not enabled in this build: {path}")]
    YamlUnavailable {
        /// YAML file that could not be parsed.
        path: PathBuf,
    },
}

impl ConfigError {
    /// `true` for a file that simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}
