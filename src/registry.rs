//! Subcommand registry.
//!
//! Sub-applications are listed as [`CommandFactory`] values and built once
//! at startup, before arguments are parsed. Each one is attached to the root
//! `clap` command under its factory name.
//!
//! A factory that fails is reported on stderr and skipped, so one broken
//! command never takes the rest of the CLI down with it. Two factories with
//! the same name are a startup error.

use std::fmt;

use clap::{ArgMatches, Command};
use thiserror::Error;

use crate::context::Context;
use crate::error::CommandError;

/// Boxed error returned by a failing factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Names starting with this prefix are internal and never registered.
pub const INTERNAL_PREFIX: char = '_';

/// Names clap already uses at the root.
const RESERVED_NAMES: &[&str] = &["help"];

/// A self-contained group of one or more subcommands.
pub trait SubApp {
    /// The `clap` definition: about text, arguments, nested subcommands.
    ///
    /// The command is renamed to the factory name on registration.
    fn command(&self) -> Command;

    /// Runs the sub-application with its own slice of the parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command fails.
    fn run(&self, ctx: &Context, matches: &ArgMatches) -> Result<(), CommandError>;

    /// Whether the PID record should be held while this command runs.
    fn tracks_pid(&self) -> bool {
        true
    }
}

/// Builds a sub-application.
pub type BuildFn = fn() -> Result<Box<dyn SubApp>, BoxError>;

/// A named constructor for a sub-application.
#[derive(Clone, Copy)]
pub struct CommandFactory {
    /// Name the sub-application is registered under.
    pub name: &'static str,
    /// Constructor.
    pub build: BuildFn,
}

impl CommandFactory {
    /// Creates a factory.
    pub const fn new(name: &'static str, build: BuildFn) -> Self {
        Self { name, build }
    }
}

impl fmt::Debug for CommandFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFactory")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A factory that failed to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Name of the skipped command.
    pub name: &'static str,
    /// Error message from the factory.
    pub error: String,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warning: Failed to load command '{}': {}",
            self.name, self.error
        )
    }
}

/// Startup errors that stop the CLI.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Two factories share a name.
    #[error("Command '{name}' is registered more than once")]
    Duplicate {
        /// The colliding name.
        name: String,
    },

    /// The name is empty, contains whitespace, or is reserved.
    #[error("Invalid command name: '{name}'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },
}

/// Registered sub-applications in factory order. Immutable once loaded.
#[derive(Default)]
pub struct CommandRegistry {
    apps: Vec<(&'static str, Box<dyn SubApp>)>,
    failures: Vec<LoadFailure>,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .field("failures", &self.failures)
            .finish()
    }
}

impl CommandRegistry {
    /// Builds every factory in order.
    ///
    /// Internal (`_`-prefixed) names are skipped. A factory returning an
    /// error is printed as a warning on stderr, recorded in
    /// [`failures`](Self::failures), and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if a name appears twice and
    /// [`RegistryError::InvalidName`] for empty, whitespace-containing or
    /// reserved names.
    pub fn load(factories: &[CommandFactory]) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        let mut seen: Vec<&'static str> = Vec::with_capacity(factories.len());

        for factory in factories {
            let name = factory.name;
            if name.starts_with(INTERNAL_PREFIX) {
                tracing::debug!(name, "skipping internal command");
                continue;
            }
            validate_name(name)?;
            if seen.contains(&name) {
                return Err(RegistryError::Duplicate {
                    name: name.to_string(),
                });
            }
            seen.push(name);

            match (factory.build)() {
                Ok(app) => {
                    registry.apps.push((name, app));
                }
                Err(e) => {
                    let failure = LoadFailure {
                        name,
                        error: e.to_string(),
                    };
                    eprintln!("{failure}");
                    tracing::warn!(name, error = %e, "failed to load command");
                    registry.failures.push(failure);
                }
            }
        }

        Ok(registry)
    }

    /// Looks up a sub-application by name.
    pub fn get(&self, name: &str) -> Option<&dyn SubApp> {
        self.apps
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, app)| app.as_ref())
    }

    /// `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.apps.iter().map(|(name, _)| *name)
    }

    /// Number of registered sub-applications.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Factories that failed during [`load`](Self::load).
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Attaches every registered sub-application to `root`.
    pub fn augment(&self, root: Command) -> Command {
        self.apps
            .iter()
            .fold(root, |root, (name, app)| root.subcommand(app.command().name(*name)))
    }

    /// Runs the sub-application selected in `matches`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Usage`] if no registered subcommand was
    /// selected, otherwise whatever the sub-application returns.
    pub fn dispatch(&self, ctx: &Context, matches: &ArgMatches) -> Result<(), CommandError> {
        let (app, sub_matches) = self.selected(matches)?;
        app.run(ctx, sub_matches)
    }

    /// Resolves the selected subcommand to its sub-application and matches.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Usage`] when nothing registered was selected.
    pub fn selected<'m>(
        &self,
        matches: &'m ArgMatches,
    ) -> Result<(&dyn SubApp, &'m ArgMatches), CommandError> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| CommandError::Usage("no command given".to_string()))?;
        let app = self
            .get(name)
            .ok_or_else(|| CommandError::Usage(format!("unknown command '{name}'")))?;
        Ok((app, sub_matches))
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) || RESERVED_NAMES.contains(&name)
    {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
