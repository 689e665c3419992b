/// Configuration error types.
pub mod error;

/// Supported file formats and their parsers.
pub mod format;

/// Configuration resolver.
pub mod loader;

/// Untyped mapping and dot-path lookup.
pub mod mapping;

/// Candidate path resolution.
pub mod paths;

pub use error::ConfigError;
pub use loader::{load_config, ConfigResolver, ConfigSource, LoadedConfig};
pub use mapping::{get_config_value, Config};
