//! `hello` - prints a fixed greeting.

use clap::{ArgMatches, Command};

use crate::context::Context;
use crate::error::CommandError;
use crate::registry::{BoxError, SubApp};

pub(crate) const GREETING: &str = "Hello from Project B CLI!";

pub(crate) struct Hello;

pub(crate) fn build() -> Result<Box<dyn SubApp>, BoxError> {
    Ok(Box::new(Hello))
}

impl SubApp for Hello {
    fn command(&self) -> Command {
        Command::new("hello").about("Say hello from Project B CLI!")
    }

    fn run(&self, _ctx: &Context, _matches: &ArgMatches) -> Result<(), CommandError> {
        tracing::debug!("hello");
        println!("{GREETING}");
        Ok(())
    }
}
