//! Built-in sub-applications.
//!
//! - `hello` - greeting, the smallest possible command
//! - `config` - inspect the resolved configuration (show, get, paths)
//! - `status` - report the PID record
//! - `env` - environment summary
//! - `state` - flat key-value store under `var/`

pub(crate) mod config;
pub(crate) mod env;
pub(crate) mod hello;
pub(crate) mod state;
pub(crate) mod status;

use crate::registry::CommandFactory;

/// Factories for every built-in sub-application, in registration order.
pub fn builtin() -> Vec<CommandFactory> {
    vec![
        CommandFactory::new("hello", hello::build),
        CommandFactory::new("config", config::build),
        CommandFactory::new("status", status::build),
        CommandFactory::new("env", env::build),
        CommandFactory::new("state", state::build),
    ]
}
