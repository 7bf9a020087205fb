//! Command pattern interfaces
//!
//! Every CLI operation is a command object built once from the parsed
//! arguments, so catalog loading, split planning and filesystem work all
//! stay out of `main`.

use crate::errors::SceneResult;
use crate::utils::logger::Logger;

/// An executable catalog operation
///
/// A command carries everything it needs to run (its parsed arguments and
/// a logger) and performs the whole operation in `execute`.
pub trait Command {
    /// Runs the operation to completion
    ///
    /// # Returns
    /// `Ok(())` on success, or the error that stopped the operation
    fn execute(&self) -> SceneResult<()>;
}

/// Picks and builds the command the CLI arguments ask for
pub trait CommandFactory<'a> {
    /// Constructs the matching command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger the command records its operations to
    ///
    /// # Returns
    /// The boxed command, or an error when the arguments cannot be parsed
    /// into any operation
    fn create_command(&self, args: &clap::ArgMatches, logger: &'a Logger) -> SceneResult<Box<dyn Command + 'a>>;
}
