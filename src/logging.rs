//! Logging initialization for the CLI.
//!
//! Installs a `tracing` subscriber with two sinks: stdout and an append-mode
//! file at `logs/cli.log` under the workspace root. The sinks are attached
//! once per process. Calling [`setup`] again hands back the same [`Logging`]
//! handle and only swaps the level filter, so no log line is ever written
//! twice.
//!
//! # Usage
//!
//! ```bash
//! # Level from the command line
//! pb --log-level debug hello
//!
//! # Filter directives override the level
//! PB_LOG=project_b_cli::config=trace,warn pb hello
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt as tfmt, reload, EnvFilter, Registry};

use crate::workspace::Workspace;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV_VAR: &str = "PB_LOG";

static INSTALLED: OnceLock<Logging> = OnceLock::new();

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Full trace output.
    Trace,
    /// Debug-level detail.
    Debug,
    /// Informational messages (default).
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Only errors.
    Error,
}

impl LogLevel {
    /// Maps a level name case-insensitively, falling back to `Info`.
    ///
    /// Accepts `warning` for `warn`, and `critical`/`fatal` for `error`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "critical" | "fatal" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// Options for [`setup`].
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Verbosity when `PB_LOG` is unset.
    pub level: LogLevel,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
    /// Use ANSI colours on stdout. The file sink never does.
    pub color: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json: false,
            color: true,
        }
    }
}

/// Errors raised while installing the subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Could not create the workspace directories.
    #[error("Failed to create log directory under {path}")]
    CreateDir {
        /// Workspace root.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Could not open the log file.
    #[error("Failed to open log file in {path}")]
    LogFile {
        /// Directory of the log file.
        path: PathBuf,
        /// Underlying appender error.
        #[source]
        source: InitError,
    },

    /// Another global subscriber was installed first.
    #[error("A global tracing subscriber is already installed")]
    Install(#[source] TryInitError),

    /// The level filter could not be swapped.
    #[error("Failed to update log level: {0}")]
    Reload(String),
}

/// Handle to the installed subscriber.
///
/// Created once at startup and carried in the command context.
#[derive(Clone)]
pub struct Logging {
    filter: reload::Handle<EnvFilter, Registry>,
    log_file: PathBuf,
    json: bool,
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logging")
            .field("log_file", &self.log_file)
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}

impl Logging {
    /// Path of the file sink.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Whether the sinks write JSON lines.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Replaces the level filter. `PB_LOG` still takes precedence.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Reload`] if the subscriber has been dropped.
    pub fn set_level(&self, level: LogLevel) -> Result<(), LoggingError> {
        self.filter
            .reload(build_filter(level))
            .map_err(|e| LoggingError::Reload(e.to_string()))
    }
}

/// Installs the subscriber, or reconfigures the one already installed.
///
/// The first call creates the workspace directories and attaches the stdout
/// and file sinks. Later calls only apply `settings.level`; the sinks, their
/// format and the log file location stay as first configured.
///
/// # Errors
///
/// Returns a [`LoggingError`] if the directories or log file cannot be
/// created, or if a different global subscriber is already installed.
pub fn setup(workspace: &Workspace, settings: &LogSettings) -> Result<Logging, LoggingError> {
    if let Some(existing) = INSTALLED.get() {
        existing.set_level(settings.level)?;
        tracing::debug!(level = %settings.level, "logging reconfigured");
        return Ok(existing.clone());
    }

    workspace
        .ensure_dirs()
        .map_err(|source| LoggingError::CreateDir {
            path: workspace.root().to_path_buf(),
            source,
        })?;

    let logs_dir = workspace.logs_dir();
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("cli")
        .filename_suffix("log")
        .build(&logs_dir)
        .map_err(|source| LoggingError::LogFile {
            path: logs_dir.clone(),
            source,
        })?;

    let (filter, handle) = reload::Layer::new(build_filter(settings.level));
    let json = settings.json;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                tfmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tfmt::layer()
                    .json()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file_appender),
            )
            .try_init()
    } else {
        registry
            .with(
                tfmt::layer()
                    .with_target(true)
                    .with_ansi(settings.color)
                    .with_writer(std::io::stdout),
            )
            .with(
                tfmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file_appender),
            )
            .try_init()
    };
    result.map_err(LoggingError::Install)?;

    let logging = Logging {
        filter: handle,
        log_file: workspace.log_path(),
        json,
    };
    let installed = INSTALLED.get_or_init(|| logging);
    tracing::debug!(level = %settings.level, json, "logging configured");
    Ok(installed.clone())
}

fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}
