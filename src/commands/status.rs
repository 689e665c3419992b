//! `status` - reports the PID record without touching it.

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use crate::context::Context;
use crate::error::CommandError;
use crate::persist::{is_process_running, read_pid, remove_pid};
use crate::registry::{BoxError, SubApp};
use crate::workspace::Workspace;

/// State of the PID record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RunState {
    /// No record.
    NotRunning,
    /// Record present and the process exists.
    Running,
    /// Record present but the process is gone.
    Stale,
}

impl RunState {
    fn label(self) -> &'static str {
        match self {
            RunState::NotRunning => "not running",
            RunState::Running => "running",
            RunState::Stale => "stale",
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusReport {
    status: RunState,
    pid: Option<u32>,
    pid_file: String,
    cleaned: bool,
}

pub(crate) struct Status;

pub(crate) fn build() -> Result<Box<dyn SubApp>, BoxError> {
    Ok(Box::new(Status))
}

/// Classifies the PID record under `workspace`.
pub(crate) fn run_state(workspace: &Workspace) -> (RunState, Option<u32>) {
    match read_pid(workspace) {
        None => (RunState::NotRunning, None),
        Some(pid) if is_process_running(pid) => (RunState::Running, Some(pid)),
        Some(pid) => (RunState::Stale, Some(pid)),
    }
}

impl SubApp for Status {
    fn command(&self) -> Command {
        Command::new("status")
            .about("Show whether a pb process holds the PID record")
            .arg(
                Arg::new("clean")
                    .long("clean")
                    .action(ArgAction::SetTrue)
                    .help("Remove the record if its process is gone"),
            )
    }

    fn run(&self, ctx: &Context, matches: &ArgMatches) -> Result<(), CommandError> {
        let (status, pid) = run_state(&ctx.workspace);
        let cleaned = status == RunState::Stale && matches.get_flag("clean");
        if cleaned {
            remove_pid(&ctx.workspace)?;
            tracing::debug!(?pid, "removed stale PID record");
        }

        let report = StatusReport {
            status,
            pid,
            pid_file: ctx.workspace.pid_path().display().to_string(),
            cleaned,
        };
        if ctx.output.is_json() {
            ctx.output.print(&report)?;
            return Ok(());
        }

        println!("Project B CLI");
        println!("  Status:   {}", status.label());
        if let Some(pid) = pid {
            println!("  PID:      {pid}");
        }
        println!("  PID file: {}", report.pid_file);
        if cleaned {
            println!("  Removed stale PID record.");
        }
        Ok(())
    }

    // Reporting on the record must not overwrite it.
    fn tracks_pid(&self) -> bool {
        false
    }
}
