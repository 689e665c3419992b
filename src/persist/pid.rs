//! PID record for the running CLI process.
//!
//! The record is the decimal process id in `.runtime/pb.pid` under the
//! workspace root. There is no locking: two invocations started at the same
//! time overwrite each other and the last writer wins.

use std::fs;
use std::io::ErrorKind;

use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::persist::error::PersistError;
use crate::workspace::Workspace;

/// Writes the current process id to the workspace PID record.
///
/// # Errors
///
/// Returns a [`PersistError`] if the runtime directory or the file cannot be
/// written.
pub fn write_pid(workspace: &Workspace) -> Result<(), PersistError> {
    let dir = workspace.runtime_dir();
    fs::create_dir_all(&dir).map_err(|source| PersistError::CreateDir { path: dir, source })?;

    let path = workspace.pid_path();
    fs::write(&path, std::process::id().to_string())
        .map_err(|source| PersistError::Write { path, source })
}

/// Reads the PID record.
///
/// Returns `None` when the file is missing or does not hold an integer.
pub fn read_pid(workspace: &Workspace) -> Option<u32> {
    fs::read_to_string(workspace.pid_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Removes the PID record. Does nothing if it is already gone.
///
/// # Errors
///
/// Returns [`PersistError::Remove`] for failures other than "not found".
pub fn remove_pid(workspace: &Workspace) -> Result<(), PersistError> {
    let path = workspace.pid_path();
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PersistError::Remove { path, source }),
    }
}

/// Returns `true` if a process with the given id currently exists.
pub fn is_process_running(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid).is_some()
}

/// Holds the PID record for the lifetime of a command.
///
/// Writes the record on [`PidGuard::acquire`] and removes it on drop, as long
/// as the record still names this process.
#[derive(Debug)]
pub struct PidGuard {
    workspace: Workspace,
    pid: u32,
}

impl PidGuard {
    /// Writes the PID record and returns the guard that will remove it.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the record cannot be written.
    pub fn acquire(workspace: &Workspace) -> Result<Self, PersistError> {
        write_pid(workspace)?;
        Ok(Self {
            workspace: workspace.clone(),
            pid: std::process::id(),
        })
    }

    /// Process id written by this guard.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for PidGuard {
    fn drop(&mut self) {
        // Another invocation may have overwritten the record since; leave theirs alone.
        if read_pid(&self.workspace) != Some(self.pid) {
            return;
        }
        if let Err(e) = remove_pid(&self.workspace) {
            tracing::warn!(error = %e, "could not remove PID file");
        }
    }
}
