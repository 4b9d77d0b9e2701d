//! mcd: create new projects and manage existing ones.
//!
//! The crate is a command dispatcher: commands are described by
//! [`cli::CommandDescriptor`] values, assembled into a validated
//! [`cli::CommandRegistry`] and run by a [`cli::Dispatcher`].

pub mod cli;
pub mod config;
pub mod exitcode;
pub mod util;
