//! CLI layer: command tree, argument parsing and dispatch

pub mod args;
pub mod builtin;
pub mod commands;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod registry;

pub use descriptor::{Action, CommandDescriptor};
pub use dispatch::{Context, Dispatcher, Invocation, Resolution};
pub use error::{ActionError, ActionResult, CliError, CliResult, RegistryError};
pub use registry::CommandRegistry;
