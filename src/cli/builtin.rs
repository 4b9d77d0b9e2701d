//! Built-in `help` and `completion` commands
//!
//! Attached by [`CommandRegistry::new`](crate::cli::registry::CommandRegistry::new)
//! only when the root has subcommands of its own.

use std::io::Write;

use clap::{value_parser, Arg};
use clap_complete::Shell;

use crate::cli::descriptor::CommandDescriptor;
use crate::cli::dispatch::Context;
use crate::cli::error::{ActionError, ActionResult};
use crate::cli::output;
use crate::cli::registry::leaf_command;

pub const HELP: &str = "help";
pub const COMPLETION: &str = "completion";

pub fn commands() -> Vec<CommandDescriptor> {
    vec![help(), completion()]
}

fn help() -> CommandDescriptor {
    CommandDescriptor::new(HELP, "Help about any command")
        .long_about("Help provides help for any command in the application.\nSimply type mcd help [path to command] for full details.")
        .arg(
            Arg::new("command")
                .value_name("COMMAND")
                .num_args(0..)
                .help("Command path to describe"),
        )
        .action(run_help)
}

fn run_help(ctx: &mut Context<'_>) -> ActionResult {
    let names: Vec<String> = ctx
        .matches()
        .get_many::<String>("command")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let path = ctx
        .registry()
        .locate(names.as_slice())
        .map_err(|e| ActionError::new(e.to_string()).with_exit_code(e.exit_code()))?;
    let text = leaf_command(&path).render_help().to_string();
    output::block(ctx.out(), &text);
    Ok(())
}

fn completion() -> CommandDescriptor {
    CommandDescriptor::new(COMPLETION, "Generate the autocompletion script for the specified shell")
        .arg(
            Arg::new("shell")
                .required(true)
                .value_parser(value_parser!(Shell))
                .help("Shell type"),
        )
        .action(run_completion)
}

fn run_completion(ctx: &mut Context<'_>) -> ActionResult {
    let shell = ctx
        .matches()
        .get_one::<Shell>("shell")
        .copied()
        .ok_or_else(|| ActionError::new("no shell given"))?;

    let registry = ctx.registry();
    let mut cmd = registry.to_clap_tree();
    let bin_name = registry.root().name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, ctx.out());
    ctx.out().flush()?;
    Ok(())
}
