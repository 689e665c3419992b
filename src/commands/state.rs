//! `state` - flat key-value JSON store.
//!
//! Values live in `var/state.json` unless `--file` names another path
//! (relative to the workspace root). Reads never fail: a missing or corrupt
//! file is an empty store.

use std::path::PathBuf;

use clap::{ArgMatches, Args, Command, FromArgMatches, Subcommand};
use serde_json::{json, Map, Value};

use crate::context::Context;
use crate::error::CommandError;
use crate::output::{confirm, render};
use crate::persist::{load_json_or, save_json};
use crate::registry::{BoxError, SubApp};

const STATE_FILE_NAME: &str = "state.json";

type Store = Map<String, Value>;

#[derive(Args, Debug)]
struct StateArgs {
    /// State file (default: var/state.json)
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    action: StateAction,
}

/// Actions for the `state` subcommand.
#[derive(Subcommand, Debug, PartialEq)]
enum StateAction {
    /// Print one stored value (null if absent)
    Get {
        /// Key to read
        key: String,
    },
    /// Store a value (parsed as JSON if possible, else a string)
    Set {
        /// Key to write
        key: String,
        /// Value to store
        value: String,
    },
    /// Print every stored value
    List,
    /// Remove every stored value
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub(crate) struct State;

pub(crate) fn build() -> Result<Box<dyn SubApp>, BoxError> {
    Ok(Box::new(State))
}

impl SubApp for State {
    fn command(&self) -> Command {
        StateArgs::augment_args(
            Command::new("state")
                .about("Read and write persisted key-value state")
                .subcommand_required(true)
                .arg_required_else_help(true),
        )
    }

    fn run(&self, ctx: &Context, matches: &ArgMatches) -> Result<(), CommandError> {
        let args = StateArgs::from_arg_matches(matches)?;
        let path = match &args.file {
            Some(file) => ctx.workspace.resolve_path(file),
            None => ctx.workspace.var_dir().join(STATE_FILE_NAME),
        };
        tracing::debug!(path = %path.display(), action = ?args.action, "state");

        let mut store: Store = load_json_or(&path, Store::new());
        match args.action {
            StateAction::Get { key } => {
                let value = store.get(&key).cloned().unwrap_or(Value::Null);
                ctx.output.print(&value)?;
            }
            StateAction::Set { key, value } => {
                let value = parse_value(&value);
                store.insert(key.clone(), value.clone());
                save_json(&path, &store)?;
                if ctx.output.is_json() {
                    ctx.output.print(&json!({ "key": key, "value": value }))?;
                } else {
                    println!("{key} = {}", render(&value, false));
                }
            }
            StateAction::List => ctx.output.print(&store)?,
            StateAction::Clear { yes } => {
                if !yes && !confirm(&format!("Clear {} stored value(s)?", store.len()), true)? {
                    println!("Cancelled.");
                    return Ok(());
                }
                save_json(&path, &Store::new())?;
                tracing::info!(path = %path.display(), "state cleared");
            }
        }
        Ok(())
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::persist::load_json;

    fn run(ctx: &Context, args: &[&str]) {
        let matches = test_support::matches(&State, args);
        State.run(ctx, &matches).expect("state command should succeed");
    }

    fn stored(ctx: &Context) -> Store {
        load_json(&ctx.workspace.var_dir().join(STATE_FILE_NAME)).expect("state file")
    }

    #[test]
    fn set_then_get() {
        let (_dir, ctx) = test_support::context();
        run(&ctx, &["set", "count", "3"]);
        run(&ctx, &["set", "name", "widget"]);
        run(&ctx, &["get", "count"]);

        let store = stored(&ctx);
        assert_eq!(store.get("count"), Some(&json!(3)));
        assert_eq!(store.get("name"), Some(&json!("widget")));
    }

    #[test]
    fn set_overwrites_existing_key() {
        let (_dir, ctx) = test_support::context();
        run(&ctx, &["set", "k", "1"]);
        run(&ctx, &["set", "k", "[1,2]"]);
        assert_eq!(stored(&ctx).get("k"), Some(&json!([1, 2])));
    }

    #[test]
    fn clear_with_yes_empties_store() {
        let (_dir, ctx) = test_support::context();
        run(&ctx, &["set", "k", "v"]);
        run(&ctx, &["clear", "--yes"]);
        assert!(stored(&ctx).is_empty());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let (_dir, ctx) = test_support::context();
        let path = ctx.workspace.var_dir().join(STATE_FILE_NAME);
        std::fs::create_dir_all(ctx.workspace.var_dir()).expect("mkdir");
        std::fs::write(&path, "{not json").expect("write");

        run(&ctx, &["get", "anything"]);
        run(&ctx, &["set", "k", "true"]);
        assert_eq!(stored(&ctx).get("k"), Some(&json!(true)));
    }

    #[test]
    fn file_option_is_relative_to_workspace() {
        let (dir, ctx) = test_support::context();
        run(&ctx, &["--file", "custom/s.json", "set", "k", "v"]);
        let store: Store = load_json(&dir.path().join("custom/s.json")).expect("custom file");
        assert_eq!(store.get("k"), Some(&json!("v")));
        assert!(!ctx.workspace.var_dir().join(STATE_FILE_NAME).exists());
    }

    #[test]
    fn requires_an_action() {
        assert!(State.command().try_get_matches_from(["state"]).is_err());
    }

    #[test]
    fn values_parse_as_json_when_possible() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_value("hello"), json!("hello"));
    }
}
