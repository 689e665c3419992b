//! Errors returned by sub-applications.

use thiserror::Error;

use crate::persist::PersistError;

/// Failure of a dispatched command. Printed as `Error: ...` by `main`.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Arguments were accepted by clap but make no sense to the command.
    #[error("{0}")]
    Usage(String),

    /// Writing persisted state failed.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// The result could not be rendered.
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsed matches did not fit the command's argument types.
    #[error(transparent)]
    Arguments(#[from] clap::Error),
}
