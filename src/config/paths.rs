//! Candidate locations for the configuration file.
//!
//! Probe order when no `--config` is given (first found wins):
//! 1. `$PROJECT_B_CONFIG`
//! 2. `~/.project_b/config.yaml`
//! 3. `~/.project_b/config.json`
//! 4. `<cwd>/project_b/config/default.yaml`
//! 5. `<cwd>/project_b/config/default.json`

use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PROJECT_B_CONFIG";

const USER_CONFIG_DIR: &str = ".project_b";
const PROJECT_CONFIG_DIR: &str = "project_b/config";

/// Where a candidate path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// Named by `PROJECT_B_CONFIG`.
    Environment,
    /// Under the user's home directory.
    UserHome,
    /// Under the workspace root.
    ProjectDefault,
}

/// One probed location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Candidate {
    /// File to try.
    pub path: PathBuf,
    /// Origin of the path.
    pub kind: CandidateKind,
}

/// Builds the ordered candidate list.
///
/// `env_override` is skipped when `None`; the home-directory candidates are
/// skipped when the home directory is unknown.
pub fn candidate_paths(
    env_override: Option<&Path>,
    home: Option<&Path>,
    cwd: &Path,
) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(5);
    if let Some(p) = env_override {
        out.push(Candidate {
            path: p.to_path_buf(),
            kind: CandidateKind::Environment,
        });
    }
    if let Some(home) = home {
        let dir = home.join(USER_CONFIG_DIR);
        for name in ["config.yaml", "config.json"] {
            out.push(Candidate {
                path: dir.join(name),
                kind: CandidateKind::UserHome,
            });
        }
    }
    let dir = cwd.join(PROJECT_CONFIG_DIR);
    for name in ["default.yaml", "default.json"] {
        out.push(Candidate {
            path: dir.join(name),
            kind: CandidateKind::ProjectDefault,
        });
    }
    out
}

/// Reads `PROJECT_B_CONFIG`, treating an unset or empty value as absent.
pub fn env_override() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| expand_tilde(&v))
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// If the path does not start with `~`, or the home directory is unknown,
/// it is returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}
