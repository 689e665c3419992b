//! Project B CLI - entry point for the `pb` binary.
//!
//! Builds the command registry before parsing so every registered
//! sub-application shows up in `--help`, then sets up logging and
//! configuration once and dispatches the selected command.

use clap::{ArgMatches, Args, Command, CommandFactory, FromArgMatches, Parser};
use project_b_cli::config::ConfigResolver;
use project_b_cli::profile::CpuProfile;
use project_b_cli::{
    commands, logging, CommandError, CommandRegistry, Context, LogLevel, LogSettings, Output,
    PidGuard, Workspace,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Project B CLI
#[derive(Parser, Debug)]
#[command(name = "pb")]
#[command(version, about = "Project B CLI: run, inspect, and debug Project B subsystems")]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
}

/// Flags accepted before or after any subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
struct GlobalArgs {
    /// Path to a YAML, JSON or TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "INFO", value_name = "LEVEL")]
    log_level: String,

    /// Print results as compact JSON and log JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI colours in console logs
    #[arg(long, global = true)]
    no_color: bool,

    /// Working directory for runtime, log and state files
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Report wall time, CPU and memory of the command on stderr
    #[arg(long, global = true)]
    profile_cpu: bool,
}

fn main() -> ExitCode {
    let registry = match CommandRegistry::load(&commands::builtin()) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Argument errors exit with clap's status 2 here.
    let matches = build_cli(&registry).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    match run(&cli.global, &registry, &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Root command with every registered sub-application attached.
fn build_cli(registry: &CommandRegistry) -> Command {
    registry.augment(Cli::command())
}

fn run(
    global: &GlobalArgs,
    registry: &CommandRegistry,
    matches: &ArgMatches,
) -> Result<(), CommandError> {
    let workspace = Workspace::resolve(global.cwd.as_deref())?;

    let settings = LogSettings {
        level: LogLevel::parse_lenient(&global.log_level),
        json: global.json,
        color: !global.no_color,
    };
    let logging = match logging::setup(&workspace, &settings) {
        Ok(logging) => Some(logging),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e}");
            None
        }
    };

    let resolver = ConfigResolver::from_env(&workspace);
    let explicit = global.config.as_deref().map(|p| workspace.resolve_path(p));
    let config = resolver.load(explicit.as_deref());
    tracing::debug!(source = %config.source, "configuration resolved");

    let ctx = Context::new(
        workspace,
        config,
        resolver,
        Output::new(global.json),
        logging,
    );

    let (app, sub_matches) = registry.selected(matches)?;
    let _pid = if app.tracks_pid() {
        match PidGuard::acquire(&ctx.workspace) {
            Ok(guard) => Some(guard),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    } else {
        None
    };

    let profile = global.profile_cpu.then(CpuProfile::start);
    let result = app.run(&ctx, sub_matches);
    if let Some(profile) = profile {
        let report = profile.finish();
        report.log();
        eprintln!("{report}");
    }
    result
}
