//! Command context - shared state for every sub-application.
//!
//! Created once in `main` after logging and configuration are set up, then
//! passed by reference to the dispatched command.

use crate::config::{ConfigResolver, LoadedConfig};
use crate::logging::Logging;
use crate::output::Output;
use crate::workspace::Workspace;

/// Shared context for dispatched commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working root for all relative state.
    pub workspace: Workspace,
    /// Resolved configuration and where it came from.
    pub config: LoadedConfig,
    /// Resolver that produced `config`, kept for `config paths`.
    pub resolver: ConfigResolver,
    /// Result renderer honouring `--json`.
    pub output: Output,
    /// Logging handle; `None` when the subscriber could not be installed.
    pub logging: Option<Logging>,
}

impl Context {
    /// Creates a context.
    pub fn new(
        workspace: Workspace,
        config: LoadedConfig,
        resolver: ConfigResolver,
        output: Output,
        logging: Option<Logging>,
    ) -> Self {
        Self {
            workspace,
            config,
            resolver,
            output,
            logging,
        }
    }

    /// A context with no configuration and no logging, rooted at `workspace`.
    ///
    /// The resolver only looks under the workspace root.
    pub fn for_workspace(workspace: Workspace) -> Self {
        let resolver = ConfigResolver::new(None, None, workspace.root().to_path_buf());
        Self::new(
            workspace,
            LoadedConfig::default(),
            resolver,
            Output::default(),
            None,
        )
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: LoadedConfig) -> Self {
        self.config = config;
        self
    }
}
