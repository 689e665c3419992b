//! Error types for writing persisted state.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing state to disk.
///
/// Reads never produce these; they degrade to `None` instead.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Could not create the directory that should contain the file.
    #[error("Failed to create directory: {path}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The value could not be serialized to JSON.
    #[error("Failed to serialize JSON for {path}")]
    Serialize {
        /// Target file.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing or syncing the temporary file failed.
    #[error("Failed to write file: {path}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Renaming the temporary file over the target failed.
    #[error("Failed to replace {path} - temporary copy kept at: {temp_path}")]
    Replace {
        /// Target file.
        path: PathBuf,
        /// Temporary file that still holds the new content.
        temp_path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Removing a file failed for a reason other than it being absent.
    #[error("Failed to remove file: {path}")]
    Remove {
        /// File that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
