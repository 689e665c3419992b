//! Configuration resolver.
//!
//! Loads the first available config from an explicit path or the candidate
//! list. Nothing here returns an error to the caller: a missing or malformed
//! file is logged and treated as absent, and the fallback is an empty mapping.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::format::ConfigFormat;
use crate::config::mapping::Config;
use crate::config::paths::{self, Candidate, CandidateKind};
use crate::workspace::Workspace;

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    /// The `--config` argument.
    Explicit(PathBuf),
    /// The `PROJECT_B_CONFIG` variable.
    Environment(PathBuf),
    /// A file under `~/.project_b/`.
    UserHome(PathBuf),
    /// A file under `<cwd>/project_b/config/`.
    ProjectDefault(PathBuf),
    /// Nothing was found; the mapping is empty.
    Empty,
}

impl ConfigSource {
    fn from_candidate(candidate: &Candidate) -> Self {
        let path = candidate.path.clone();
        match candidate.kind {
            CandidateKind::Environment => ConfigSource::Environment(path),
            CandidateKind::UserHome => ConfigSource::UserHome(path),
            CandidateKind::ProjectDefault => ConfigSource::ProjectDefault(path),
        }
    }

    /// The file the configuration was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserHome(p)
            | ConfigSource::ProjectDefault(p) => Some(p),
            ConfigSource::Empty => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "--config {}", p.display()),
            ConfigSource::Environment(p) => {
                write!(f, "${} {}", paths::CONFIG_ENV_VAR, p.display())
            }
            ConfigSource::UserHome(p) | ConfigSource::ProjectDefault(p) => {
                write!(f, "{}", p.display())
            }
            ConfigSource::Empty => write!(f, "(none)"),
        }
    }
}

/// A configuration mapping together with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    /// The parsed mapping (empty when nothing was found).
    pub config: Config,
    /// Where it came from.
    pub source: ConfigSource,
}

impl Default for LoadedConfig {
    fn default() -> Self {
        Self {
            config: Config::default(),
            source: ConfigSource::Empty,
        }
    }
}

/// Probes the candidate locations in order.
///
/// Holds the inputs of the search explicitly so the order can be inspected
/// and tested without touching the real home directory or environment.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    env_override: Option<PathBuf>,
    home: Option<PathBuf>,
    cwd: PathBuf,
}

impl ConfigResolver {
    /// Creates a resolver from explicit search inputs.
    pub fn new(env_override: Option<PathBuf>, home: Option<PathBuf>, cwd: PathBuf) -> Self {
        Self {
            env_override,
            home,
            cwd,
        }
    }

    /// Creates a resolver from `PROJECT_B_CONFIG`, the user's home directory
    /// and the workspace root.
    pub fn from_env(workspace: &Workspace) -> Self {
        Self::new(
            paths::env_override(),
            dirs::home_dir(),
            workspace.root().to_path_buf(),
        )
    }

    /// The ordered candidate list.
    pub fn candidates(&self) -> Vec<Candidate> {
        paths::candidate_paths(
            self.env_override.as_deref(),
            self.home.as_deref(),
            &self.cwd,
        )
    }

    /// Loads the configuration.
    ///
    /// With `explicit` set only that file is tried. Otherwise the first
    /// candidate that exists and parses wins; later candidates are ignored.
    pub fn load(&self, explicit: Option<&Path>) -> LoadedConfig {
        if let Some(path) = explicit {
            return match try_load(path) {
                Ok(config) => LoadedConfig {
                    config,
                    source: ConfigSource::Explicit(path.to_path_buf()),
                },
                Err(e) => {
                    tracing::warn!("{e}");
                    LoadedConfig::default()
                }
            };
        }

        for candidate in self.candidates() {
            match try_load(&candidate.path) {
                // An empty mapping still counts as found and ends the search.
                Ok(config) => {
                    tracing::debug!(path = %candidate.path.display(), "loaded configuration");
                    return LoadedConfig {
                        config,
                        source: ConfigSource::from_candidate(&candidate),
                    };
                }
                Err(e) if e.is_not_found() => {
                    tracing::trace!(path = %candidate.path.display(), "no config candidate");
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }

        tracing::debug!("no configuration found, using empty mapping");
        LoadedConfig::default()
    }
}

/// Loads and parses a single configuration file.
///
/// The format is chosen from the extension.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is missing, unreadable, has an
/// unsupported extension, or fails to parse as a mapping.
pub fn try_load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content, path)
}

/// Loads configuration relative to the process current directory.
///
/// Convenience form of [`ConfigResolver::load`] that returns only the mapping.
pub fn load_config(explicit: Option<&Path>) -> Config {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    ConfigResolver::from_env(&Workspace::new(cwd))
        .load(explicit)
        .config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    struct Fixture {
        _dir: tempfile::TempDir,
        home: PathBuf,
        cwd: PathBuf,
        root: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("failed to create temp dir");
            let home = dir.path().join("home");
            let cwd = dir.path().join("work");
            fs::create_dir_all(home.join(".project_b")).expect("mkdir home");
            fs::create_dir_all(cwd.join("project_b/config")).expect("mkdir cwd");
            Self {
                root: dir.path().to_path_buf(),
                _dir: dir,
                home,
                cwd,
            }
        }

        fn resolver(&self, env_override: Option<PathBuf>) -> ConfigResolver {
            ConfigResolver::new(env_override, Some(self.home.clone()), self.cwd.clone())
        }

        fn user(&self, name: &str) -> PathBuf {
            self.home.join(".project_b").join(name)
        }

        fn project(&self, name: &str) -> PathBuf {
            self.cwd.join("project_b/config").join(name)
        }
    }

    // -----------------------------------------------------------------------
    // Explicit path
    // -----------------------------------------------------------------------

    #[test]
    fn explicit_json_file_is_loaded() {
        let fx = Fixture::new();
        let path = fx.root.join("custom.json");
        fs::write(&path, r#"{"a": {"b": 2}}"#).expect("write");
        let loaded = fx.resolver(None).load(Some(&path));
        assert_eq!(loaded.config.get("a.b"), Some(&json!(2)));
        assert_eq!(loaded.source, ConfigSource::Explicit(path));
    }

    #[test]
    fn explicit_missing_file_returns_empty() {
        let fx = Fixture::new();
        let loaded = fx.resolver(None).load(Some(&fx.root.join("nope.yaml")));
        assert!(loaded.config.is_empty());
        assert_eq!(loaded.source, ConfigSource::Empty);
    }

    #[test]
    fn explicit_malformed_files_return_empty() {
        let fx = Fixture::new();
        let cases = [
            ("bad.json", "{oops"),
            ("bad.toml", "key = \ninvalid"),
            ("list.json", "[1, 2, 3]"),
            ("notes.txt", "a = 1"),
        ];
        for (name, content) in cases {
            let path = fx.root.join(name);
            fs::write(&path, content).expect("write");
            let loaded = fx.resolver(None).load(Some(&path));
            assert!(loaded.config.is_empty(), "{name} should degrade to {{}}");
            assert_eq!(loaded.source, ConfigSource::Empty);
        }
    }

    #[test]
    fn explicit_path_ignores_candidates() {
        let fx = Fixture::new();
        fs::write(fx.user("config.json"), r#"{"from": "home"}"#).expect("write");
        let loaded = fx.resolver(None).load(Some(&fx.root.join("missing.json")));
        assert!(loaded.config.is_empty());
    }

    #[test]
    fn explicit_empty_json_is_empty_mapping_from_that_file() {
        let fx = Fixture::new();
        let path = fx.root.join("empty.json");
        fs::write(&path, "").expect("write");
        let loaded = fx.resolver(None).load(Some(&path));
        assert!(loaded.config.is_empty());
        assert_eq!(loaded.source, ConfigSource::Explicit(path));
    }

    #[test]
    fn explicit_toml_file_is_loaded() {
        let fx = Fixture::new();
        let path = fx.root.join("pb.toml");
        fs::write(&path, "[mm.lt]\nindex_dir = \"/idx\"\n").expect("write");
        let loaded = fx.resolver(None).load(Some(&path));
        assert_eq!(loaded.config.get_str("mm.lt.index_dir"), Some("/idx"));
    }

    // -----------------------------------------------------------------------
    // Candidate search
    // -----------------------------------------------------------------------

    #[test]
    fn nothing_found_returns_empty() {
        let fx = Fixture::new();
        let loaded = fx.resolver(None).load(None);
        assert!(loaded.config.is_empty());
        assert_eq!(loaded.source, ConfigSource::Empty);
    }

    #[test]
    fn home_json_used_when_home_yaml_absent() {
        let fx = Fixture::new();
        fs::write(fx.user("config.json"), r#"{"a": 1}"#).expect("write");
        let loaded = fx.resolver(None).load(None);
        assert_eq!(loaded.config.clone().into_value(), json!({"a": 1}));
        assert_eq!(loaded.source, ConfigSource::UserHome(fx.user("config.json")));
    }

    #[test]
    fn earlier_candidate_wins_over_later_ones() {
        let fx = Fixture::new();
        fs::write(fx.user("config.json"), r#"{"from": "home"}"#).expect("write");
        fs::write(fx.project("default.json"), r#"{"from": "project"}"#).expect("write");
        let loaded = fx.resolver(None).load(None);
        assert_eq!(loaded.config.get_str("from"), Some("home"));
    }

    #[test]
    fn only_last_candidate_present() {
        let fx = Fixture::new();
        fs::write(fx.project("default.json"), r#"{"from": "project"}"#).expect("write");
        let loaded = fx.resolver(None).load(None);
        assert_eq!(loaded.config.get_str("from"), Some("project"));
        assert_eq!(
            loaded.source,
            ConfigSource::ProjectDefault(fx.project("default.json"))
        );
    }

    #[test]
    fn empty_candidate_stops_the_search() {
        let fx = Fixture::new();
        fs::write(fx.user("config.json"), "{}").expect("write");
        fs::write(fx.project("default.json"), r#"{"a": 1}"#).expect("write");
        let loaded = fx.resolver(None).load(None);
        assert!(loaded.config.is_empty());
        assert_eq!(loaded.source, ConfigSource::UserHome(fx.user("config.json")));
    }

    #[test]
    fn malformed_candidate_is_skipped() {
        let fx = Fixture::new();
        fs::write(fx.user("config.json"), "{broken").expect("write");
        fs::write(fx.project("default.json"), r#"{"ok": true}"#).expect("write");
        let loaded = fx.resolver(None).load(None);
        assert_eq!(loaded.config.get_bool("ok"), Some(true));
    }

    #[test]
    fn env_override_comes_first() {
        let fx = Fixture::new();
        let env_file = fx.root.join("env.json");
        fs::write(&env_file, r#"{"from": "env"}"#).expect("write");
        fs::write(fx.user("config.json"), r#"{"from": "home"}"#).expect("write");
        let loaded = fx.resolver(Some(env_file.clone())).load(None);
        assert_eq!(loaded.config.get_str("from"), Some("env"));
        assert_eq!(loaded.source, ConfigSource::Environment(env_file));
    }

    #[test]
    fn env_override_missing_falls_through() {
        let fx = Fixture::new();
        fs::write(fx.user("config.json"), r#"{"from": "home"}"#).expect("write");
        let loaded = fx.resolver(Some(fx.root.join("gone.json"))).load(None);
        assert_eq!(loaded.config.get_str("from"), Some("home"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn home_yaml_preferred_over_home_json() {
        let fx = Fixture::new();
        fs::write(fx.user("config.yaml"), "from: yaml\n").expect("write");
        fs::write(fx.user("config.json"), r#"{"from": "json"}"#).expect("write");
        let loaded = fx.resolver(None).load(None);
        assert_eq!(loaded.config.get_str("from"), Some("yaml"));
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn yaml_candidate_skipped_without_feature() {
        let fx = Fixture::new();
        fs::write(fx.user("config.yaml"), "from: yaml\n").expect("write");
        fs::write(fx.user("config.json"), r#"{"from": "json"}"#).expect("write");
        let loaded = fx.resolver(None).load(None);
        assert_eq!(loaded.config.get_str("from"), Some("json"));
    }

    #[test]
    fn candidates_list_matches_resolver_inputs() {
        let fx = Fixture::new();
        let list = fx.resolver(None).candidates();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].path, fx.user("config.yaml"));
        assert_eq!(list[3].path, fx.project("default.json"));
    }

    #[test]
    fn source_display_and_path() {
        let src = ConfigSource::UserHome(PathBuf::from("/h/.project_b/config.json"));
        assert_eq!(src.to_string(), "/h/.project_b/config.json");
        assert_eq!(src.path(), Some(Path::new("/h/.project_b/config.json")));
        assert_eq!(ConfigSource::Empty.path(), None);
        assert_eq!(ConfigSource::Empty.to_string(), "(none)");
    }

    #[test]
    #[serial]
    fn load_config_returns_mapping_only() {
        let fx = Fixture::new();
        let path = fx.root.join("direct.json");
        fs::write(&path, r#"{"db": {"port": 5432}}"#).expect("write");

        let cfg = load_config(Some(&path));
        assert_eq!(cfg.get_i64("db.port"), Some(5432));

        let missing = load_config(Some(&fx.root.join("absent.json")));
        assert_eq!(missing, Config::default());
    }
}
