//! Project B CLI library
//!
//! The scaffold behind the `pb` binary: configuration resolution, logging
//! bootstrap, small persistence helpers, and a registry of sub-applications
//! attached to the root command at startup.
//!
//! # Layout
//!
//! All local state lives under the workspace root (`--cwd` or the current
//! directory):
//!
//! - `.runtime/pb.pid` - PID record of the running command
//! - `logs/cli.log` - append-mode log file
//! - `var/` - JSON state
//!
//! # Configuration
//!
//! See [`config`] for the candidate probe order. Absence and malformed files
//! both resolve to an empty mapping.

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod persist;
pub mod profile;
pub mod registry;
pub mod workspace;

pub use config::{get_config_value, load_config, Config, ConfigSource, LoadedConfig};
pub use context::Context;
pub use error::CommandError;
pub use logging::{LogLevel, LogSettings, Logging, LoggingError};
pub use output::Output;
pub use persist::{load_json, load_json_or, read_pid, remove_pid, save_json, write_pid, PidGuard};
pub use registry::{CommandFactory, CommandRegistry, RegistryError, SubApp};
pub use workspace::Workspace;
