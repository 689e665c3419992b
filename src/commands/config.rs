//! `config` - inspect the resolved configuration.
//!
//! - `config show` - the whole mapping and where it came from
//! - `config get <key>` - one dot-path value
//! - `config paths` - the candidate probe order

use clap::{ArgMatches, Command, FromArgMatches, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::paths::CandidateKind;
use crate::context::Context;
use crate::error::CommandError;
use crate::registry::{BoxError, SubApp};

/// Actions for the `config` subcommand.
#[derive(Subcommand, Debug, PartialEq)]
enum ConfigAction {
    /// Print the resolved configuration and its source
    Show,
    /// Print one value by dot-separated key (e.g. `database.host`)
    Get {
        /// Dot-separated key
        key: String,
        /// Value printed when the key is absent (parsed as JSON if possible)
        #[arg(long)]
        default: Option<String>,
    },
    /// List candidate config locations in probe order
    Paths,
}

pub(crate) struct ConfigApp;

pub(crate) fn build() -> Result<Box<dyn SubApp>, BoxError> {
    Ok(Box::new(ConfigApp))
}

impl SubApp for ConfigApp {
    fn command(&self) -> Command {
        ConfigAction::augment_subcommands(
            Command::new("config")
                .about("Inspect the resolved configuration")
                .subcommand_required(true)
                .arg_required_else_help(true),
        )
    }

    fn run(&self, ctx: &Context, matches: &ArgMatches) -> Result<(), CommandError> {
        match ConfigAction::from_arg_matches(matches)? {
            ConfigAction::Show => show(ctx),
            ConfigAction::Get { key, default } => {
                let value = lookup(ctx, &key, default.as_deref());
                ctx.output.print(&value)?;
                Ok(())
            }
            ConfigAction::Paths => {
                ctx.output.print(&candidate_rows(ctx))?;
                Ok(())
            }
        }
    }
}

fn show(ctx: &Context) -> Result<(), CommandError> {
    if ctx.output.is_json() {
        ctx.output.print(&json!({
            "source": ctx.config.source,
            "config": ctx.config.config,
        }))?;
    } else {
        println!("# source: {}", ctx.config.source);
        ctx.output.print(&ctx.config.config)?;
    }
    Ok(())
}

/// Dot-path lookup falling back to `default`, then `null`.
fn lookup(ctx: &Context, key: &str, default: Option<&str>) -> Value {
    match ctx.config.config.get(key) {
        Some(value) => value.clone(),
        None => default.map(parse_default).unwrap_or(Value::Null),
    }
}

fn parse_default(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[derive(Debug, Serialize, PartialEq)]
struct CandidateRow {
    path: String,
    kind: CandidateKind,
    exists: bool,
    active: bool,
}

fn candidate_rows(ctx: &Context) -> Vec<CandidateRow> {
    let active = ctx.config.source.path();
    ctx.resolver
        .candidates()
        .into_iter()
        .map(|c| CandidateRow {
            exists: c.path.is_file(),
            active: active == Some(c.path.as_path()),
            path: c.path.display().to_string(),
            kind: c.kind,
        })
        .collect()
}
