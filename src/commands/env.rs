//! `env` - prints a summary of the runtime environment.

use std::path::PathBuf;

use chrono::Local;
use clap::{ArgMatches, Command};
use serde::Serialize;

use crate::context::Context;
use crate::error::CommandError;
use crate::registry::{BoxError, SubApp};

#[derive(Debug, Serialize)]
pub(crate) struct EnvSummary {
    version: &'static str,
    executable: Option<PathBuf>,
    cwd: PathBuf,
    time: String,
    args: Vec<String>,
    config_source: String,
    log_file: Option<PathBuf>,
    log_format: Option<&'static str>,
}

impl EnvSummary {
    pub(crate) fn collect(ctx: &Context) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            executable: std::env::current_exe().ok(),
            cwd: ctx.workspace.root().to_path_buf(),
            time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            args: std::env::args().collect(),
            config_source: ctx.config.source.to_string(),
            log_file: ctx.logging.as_ref().map(|l| l.log_file().to_path_buf()),
            log_format: ctx
                .logging
                .as_ref()
                .map(|l| if l.is_json() { "json" } else { "text" }),
        }
    }
}

pub(crate) struct Env;

pub(crate) fn build() -> Result<Box<dyn SubApp>, BoxError> {
    Ok(Box::new(Env))
}

impl SubApp for Env {
    fn command(&self) -> Command {
        Command::new("env").about("Show version, paths and invocation details")
    }

    fn run(&self, ctx: &Context, _matches: &ArgMatches) -> Result<(), CommandError> {
        ctx.output.print(&EnvSummary::collect(ctx))?;
        Ok(())
    }
}
