//! Validated command tree and its conversion into `clap` commands

use std::collections::HashSet;

use clap::{Arg, Command};
use tracing::{debug, instrument};

use crate::cli::builtin;
use crate::cli::descriptor::CommandDescriptor;
use crate::cli::error::{CliError, CliResult, RegistryError};

/// The command tree rooted at the tool's own descriptor.
///
/// Built once, validated on construction and read-only afterwards.
#[derive(Debug)]
pub struct CommandRegistry {
    root: CommandDescriptor,
}

impl CommandRegistry {
    /// Validate the tree and attach the built-in `help` and `completion`
    /// commands when the root has subcommands of its own.
    #[instrument(level = "debug", skip_all, fields(root = root.name()))]
    pub fn new(mut root: CommandDescriptor) -> Result<Self, RegistryError> {
        if root.has_children() {
            for cmd in builtin::commands() {
                if root.child(cmd.name()).is_none() {
                    root.children_mut().push(cmd);
                }
            }
        }
        validate_name("", root.name())?;
        validate_children(&root, &[])?;
        debug!(children = root.children().len(), "command tree validated");
        Ok(Self { root })
    }

    pub fn root(&self) -> &CommandDescriptor {
        &self.root
    }

    /// Resolve a sequence of command names to the descriptor path, root first.
    pub fn locate<S: AsRef<str>>(&self, names: &[S]) -> CliResult<Vec<&CommandDescriptor>> {
        let mut path = vec![&self.root];
        for name in names {
            let name = name.as_ref();
            let current = path[path.len() - 1];
            match current.child(name) {
                Some(child) => path.push(child),
                None => {
                    return Err(CliError::UnknownCommand {
                        token: name.to_string(),
                        command: command_path(&path),
                        suggestions: current.suggestions_for(name),
                    })
                }
            }
        }
        Ok(path)
    }

    /// The whole tree as one `clap` command, for completion scripts.
    pub fn to_clap_tree(&self) -> Command {
        tree_command(&self.root, true)
    }
}

/// Space-joined names along a descriptor path, e.g. `mcd new`.
pub fn command_path(path: &[&CommandDescriptor]) -> String {
    path.iter()
        .map(|d| d.name())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the `clap` command used to parse arguments for the last descriptor
/// of `path`. Ancestors contribute their global args; children are listed
/// for help only.
pub fn leaf_command(path: &[&CommandDescriptor]) -> Command {
    let node = path[path.len() - 1];
    let mut cmd = base_command(node)
        .bin_name(command_path(path))
        .args(node.args().iter().cloned());

    for ancestor in &path[..path.len() - 1] {
        for arg in ancestor.global_args() {
            cmd = cmd.arg(arg.clone());
        }
    }

    for child in node.children() {
        cmd = cmd.subcommand(Command::new(child.name().to_string()).about(child.about().to_string()));
    }
    cmd
}

fn tree_command(node: &CommandDescriptor, is_root: bool) -> Command {
    let mut cmd = base_command(node).args(node.args().iter().cloned());
    if is_root {
        cmd = cmd.bin_name(node.name().to_string());
    }
    for child in node.children() {
        cmd = cmd.subcommand(tree_command(child, false));
    }
    cmd
}

fn base_command(node: &CommandDescriptor) -> Command {
    let mut cmd = Command::new(node.name().to_string())
        .about(node.about().to_string())
        .disable_help_subcommand(true);
    if let Some(long) = node.get_long_about() {
        cmd = cmd.long_about(long.to_string());
    }
    match node.get_version() {
        Some(version) => cmd.version(version.to_string()),
        None => cmd.disable_version_flag(true),
    }
}

/// `inherited` holds the global args of every ancestor of `parent`.
fn validate_children<'a>(
    parent: &'a CommandDescriptor,
    inherited: &[&'a Arg],
) -> Result<(), RegistryError> {
    let mut globals = inherited.to_vec();
    globals.extend(parent.global_args());

    let mut seen = HashSet::new();
    for child in parent.children() {
        validate_name(parent.name(), child.name())?;
        if !seen.insert(child.name()) {
            return Err(RegistryError::DuplicateCommand {
                parent: parent.name().to_string(),
                name: child.name().to_string(),
            });
        }
        validate_args(child, &globals)?;
        validate_children(child, &globals)?;
    }
    Ok(())
}

/// A command's args end up in one parser with the inherited globals, so
/// ids and flags must not clash.
fn validate_args(node: &CommandDescriptor, globals: &[&Arg]) -> Result<(), RegistryError> {
    for arg in node.args() {
        for global in globals {
            let clash = if arg.get_id() == global.get_id() {
                Some("same id")
            } else if arg.get_long().is_some() && arg.get_long() == global.get_long() {
                Some("same long flag")
            } else if arg.get_short().is_some() && arg.get_short() == global.get_short() {
                Some("same short flag")
            } else {
                None
            };
            if let Some(reason) = clash {
                return Err(RegistryError::ConflictingArg {
                    command: node.name().to_string(),
                    arg: arg.get_id().to_string(),
                    global: global.get_id().to_string(),
                    reason,
                });
            }
        }
    }
    Ok(())
}

fn validate_name(parent: &str, name: &str) -> Result<(), RegistryError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.starts_with('-') {
        "name must not start with '-'"
    } else if name.chars().any(char::is_whitespace) {
        "name must not contain whitespace"
    } else {
        return Ok(());
    };
    Err(RegistryError::InvalidName {
        parent: parent.to_string(),
        name: name.to_string(),
        reason,
    })
}
