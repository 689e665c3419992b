//! Working-directory layout for the CLI.
//!
//! Every piece of local state lives under a single root, which is the
//! `--cwd` argument when given and the process current directory otherwise:
//!
//! - `.runtime/pb.pid` - PID record of the running CLI
//! - `logs/cli.log` - append-mode log file
//! - `var/` - JSON state written by subcommands

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const RUNTIME_DIR: &str = ".runtime";
const LOGS_DIR: &str = "logs";
const VAR_DIR: &str = "var";

/// File name of the PID record inside the runtime directory.
pub const PID_FILE_NAME: &str = "pb.pid";

/// File name of the log file inside the logs directory.
pub const LOG_FILE_NAME: &str = "cli.log";

/// Resolved working root and the fixed relative layout beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Creates a workspace rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the workspace from an optional `--cwd` override.
    ///
    /// A relative override is taken relative to the process current directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the current directory is needed and cannot be
    /// determined.
    pub fn resolve(cwd: Option<&Path>) -> io::Result<Self> {
        let root = match cwd {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => std::env::current_dir()?.join(dir),
            None => std::env::current_dir()?,
        };
        Ok(Self::new(root))
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding transient files such as the PID record.
    pub fn runtime_dir(&self) -> PathBuf {
        self.root.join(RUNTIME_DIR)
    }

    /// Directory holding the log file.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Directory holding persisted JSON state.
    pub fn var_dir(&self) -> PathBuf {
        self.root.join(VAR_DIR)
    }

    /// Path of the PID record: `.runtime/pb.pid`.
    pub fn pid_path(&self) -> PathBuf {
        self.runtime_dir().join(PID_FILE_NAME)
    }

    /// Path of the log file: `logs/cli.log`.
    pub fn log_path(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }

    /// Resolves a caller-supplied path against the workspace root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Creates `.runtime/`, `logs/` and `var/` if they are missing.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error hit while creating a directory.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [self.runtime_dir(), self.logs_dir(), self.var_dir()] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_relative_to_root() {
        let ws = Workspace::new("/srv/pb");
        assert_eq!(ws.pid_path(), PathBuf::from("/srv/pb/.runtime/pb.pid"));
        assert_eq!(ws.log_path(), PathBuf::from("/srv/pb/logs/cli.log"));
        assert_eq!(ws.var_dir(), PathBuf::from("/srv/pb/var"));
    }

    #[test]
    fn ensure_dirs_creates_all_directories() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let ws = Workspace::new(dir.path());
        ws.ensure_dirs().expect("ensure_dirs should succeed");
        assert!(ws.runtime_dir().is_dir());
        assert!(ws.logs_dir().is_dir());
        assert!(ws.var_dir().is_dir());
    }

    #[test]
    fn ensure_dirs_is_idempotent() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let ws = Workspace::new(dir.path());
        ws.ensure_dirs().expect("first call");
        ws.ensure_dirs().expect("second call");
    }

    #[test]
    fn resolve_with_absolute_override() {
        let ws = Workspace::resolve(Some(Path::new("/opt/project"))).expect("resolve");
        assert_eq!(ws.root(), Path::new("/opt/project"));
    }

    #[test]
    fn resolve_with_relative_override_joins_current_dir() {
        let current = std::env::current_dir().expect("current dir");
        let ws = Workspace::resolve(Some(Path::new("sub/dir"))).expect("resolve");
        assert_eq!(ws.root(), current.join("sub/dir"));
    }

    #[test]
    fn resolve_path_keeps_absolute_paths() {
        let ws = Workspace::new("/srv/pb");
        assert_eq!(
            ws.resolve_path(Path::new("/etc/x.json")),
            PathBuf::from("/etc/x.json")
        );
        assert_eq!(
            ws.resolve_path(Path::new("var/x.json")),
            PathBuf::from("/srv/pb/var/x.json")
        );
    }
}
