//! The mcd command tree

use crate::cli::args;
use crate::cli::descriptor::CommandDescriptor;
use crate::cli::error::RegistryError;
use crate::cli::registry::CommandRegistry;

pub const NAME: &str = "mcd";
pub const ABOUT: &str = "mcd allows you to create new projects and manage existing ones";

/// The root descriptor: a grouping node with no action of its own.
///
/// Project commands attach here with [`CommandDescriptor::subcommand`].
pub fn root() -> CommandDescriptor {
    CommandDescriptor::new(NAME, ABOUT)
        .version(env!("CARGO_PKG_VERSION"))
        .arg(args::debug())
}

/// Build and validate the full command tree.
pub fn registry() -> Result<CommandRegistry, RegistryError> {
    CommandRegistry::new(root())
}
