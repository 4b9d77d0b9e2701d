//! Root dispatcher: select a command from the argument vector and run it
//!
//! An invocation moves through three phases, one way only:
//! parsing ([`Dispatcher::resolve`]), executing ([`Invocation::run`]) and
//! finalized (an exit status from [`Dispatcher::finish`]).

use std::ffi::OsString;
use std::io::Write;
use std::iter;

use clap::error::ErrorKind;
use clap::{Arg, ArgMatches};
use tracing::{debug, instrument, trace};

use crate::cli::descriptor::{Action, CommandDescriptor};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::registry::{command_path, leaf_command, CommandRegistry};
use crate::config::{Settings, SettingsError};
use crate::exitcode;

/// Outcome of parsing an argument vector.
#[derive(Debug)]
pub enum Resolution<'r> {
    /// Help, usage or version text to print on stdout; exit status 0.
    Help(String),
    /// A command action ready to run.
    Run(Invocation<'r>),
}

/// A selected command together with its parsed arguments.
pub struct Invocation<'r> {
    registry: &'r CommandRegistry,
    path: Vec<&'r CommandDescriptor>,
    matches: ArgMatches,
    action: &'r Action,
    settings: Option<Settings>,
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &command_path(&self.path))
            .field("matches", &self.matches)
            .finish_non_exhaustive()
    }
}

impl<'r> Invocation<'r> {
    pub fn command_path(&self) -> String {
        command_path(&self.path)
    }

    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Hand already loaded settings to the action instead of loading on demand.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Run the selected action exactly once.
    #[instrument(level = "debug", skip_all, fields(command = %self.command_path()))]
    pub fn run(self, out: &mut dyn Write) -> CliResult<()> {
        let Invocation {
            registry,
            path,
            matches,
            action,
            settings,
        } = self;
        let mut ctx = Context {
            registry,
            path: &path,
            matches: &matches,
            out,
            settings,
        };
        debug!("executing action");
        action(&mut ctx)?;
        Ok(())
    }
}

/// What an action gets to work with.
pub struct Context<'a> {
    registry: &'a CommandRegistry,
    path: &'a [&'a CommandDescriptor],
    matches: &'a ArgMatches,
    out: &'a mut dyn Write,
    settings: Option<Settings>,
}

impl<'a> Context<'a> {
    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    pub fn matches(&self) -> &'a ArgMatches {
        self.matches
    }

    /// The descriptor being executed.
    pub fn command(&self) -> &'a CommandDescriptor {
        self.path[self.path.len() - 1]
    }

    pub fn command_path(&self) -> String {
        command_path(self.path)
    }

    /// Standard output for the action.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Settings, loaded on first use.
    pub fn settings(&mut self) -> Result<&Settings, SettingsError> {
        let settings = match self.settings.take() {
            Some(s) => s,
            None => Settings::load()?,
        };
        Ok(self.settings.insert(settings))
    }
}

/// Walks a [`CommandRegistry`] to turn an argument vector into an action.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r CommandRegistry,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self { registry }
    }

    /// Parse `args` (program name excluded) and select what to do.
    #[instrument(level = "debug", skip_all)]
    pub fn resolve<I, T>(&self, args: I) -> CliResult<Resolution<'r>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let tokens: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let (path, rest) = self.walk(&tokens)?;
        let node = path[path.len() - 1];
        debug!(command = %command_path(&path), remaining = rest.len(), "command selected");

        let mut cmd = leaf_command(&path);
        let argv = iter::once(OsString::from(node.name())).chain(rest);
        let matches = match cmd.try_get_matches_from_mut(argv) {
            Ok(m) => m,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                return Ok(Resolution::Help(e.render().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        match node.get_action() {
            Some(action) => Ok(Resolution::Run(Invocation {
                registry: self.registry,
                path,
                matches,
                action,
                settings: None,
            })),
            None => Ok(Resolution::Help(cmd.render_help().to_string())),
        }
    }

    /// Match leading command names against the tree.
    ///
    /// Flags stay in place for the selected command's parser, a flag that
    /// takes a value keeps its value with it, and `--` ends the walk.
    fn walk(&self, tokens: &[OsString]) -> CliResult<(Vec<&'r CommandDescriptor>, Vec<OsString>)> {
        let mut path = vec![self.registry.root()];
        let mut rest = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let Some(text) = tokens[i].to_str() else {
                break;
            };
            if text == "--" {
                break;
            }
            if text.len() > 1 && text.starts_with('-') {
                rest.push(tokens[i].clone());
                if flag_takes_value(&path, text) {
                    if let Some(value) = tokens.get(i + 1) {
                        rest.push(value.clone());
                        i += 1;
                    }
                }
                i += 1;
                continue;
            }

            let node = path[path.len() - 1];
            match node.child(text) {
                Some(child) => {
                    trace!(token = text, "matched command");
                    path.push(child);
                    i += 1;
                }
                None if node.is_group() => {
                    return Err(CliError::UnknownCommand {
                        token: text.to_string(),
                        command: command_path(&path),
                        suggestions: node.suggestions_for(text),
                    });
                }
                None => break,
            }
        }

        rest.extend(tokens[i..].iter().cloned());
        Ok((path, rest))
    }

    /// Parse, execute and report; returns the exit status.
    ///
    /// This is the in-process form of running the tool: nothing terminates
    /// the process, output goes to the given sinks.
    pub fn run<I, T>(&self, args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match self.resolve(args) {
            Ok(Resolution::Help(text)) => {
                output::block(out, &text);
                exitcode::OK
            }
            Ok(Resolution::Run(invocation)) => Self::finish(invocation.run(out), err),
            Err(e) => report(err, &e),
        }
    }

    /// Turn the result of an action into an exit status.
    pub fn finish(result: CliResult<()>, err: &mut dyn Write) -> i32 {
        match result {
            Ok(()) => exitcode::OK,
            Err(e) => report(err, &e),
        }
    }
}

/// Whether `token` leaves the next argument as its value.
///
/// Flags are looked up on the current command, then among the global
/// flags of its ancestors. In a short cluster such as `-dc` the first
/// value-taking flag ends the cluster: anything after it is an inline
/// value, otherwise the next token is.
fn flag_takes_value(path: &[&CommandDescriptor], token: &str) -> bool {
    if let Some(long) = token.strip_prefix("--") {
        return !long.contains('=')
            && lookup_flag(path, |d| d.find_flag(token))
                .is_some_and(|arg| arg.get_action().takes_values());
    }

    let Some(cluster) = token.strip_prefix('-') else {
        return false;
    };
    let mut shorts = cluster.chars().peekable();
    while let Some(short) = shorts.next() {
        match lookup_flag(path, |d| d.find_short(short)) {
            Some(arg) if arg.get_action().takes_values() => return shorts.peek().is_none(),
            Some(_) => continue,
            // Unknown flag: clap reports it.
            None => return false,
        }
    }
    false
}

fn lookup_flag<'r>(
    path: &[&'r CommandDescriptor],
    find: impl Fn(&'r CommandDescriptor) -> Option<&'r Arg>,
) -> Option<&'r Arg> {
    let (node, ancestors) = path.split_last()?;
    find(*node).or_else(|| {
        ancestors
            .iter()
            .rev()
            .find_map(|a| find(*a).filter(|arg| arg.is_global_set()))
    })
}

/// Print an error to `err` and return its exit status.
///
/// Parse errors come with clap's usage hint; unknown commands get
/// suggestions and a pointer to `--help`; action errors are printed as-is.
pub fn report(err: &mut dyn Write, e: &CliError) -> i32 {
    match e {
        CliError::Parse(parse) => output::block(err, &parse.render().to_string()),
        CliError::UnknownCommand {
            command,
            suggestions,
            ..
        } => {
            output::error(err, e);
            if !suggestions.is_empty() {
                output::line(err, "\nDid you mean this?");
                for s in suggestions {
                    output::line(err, &format!("\t{s}"));
                }
                output::line(err, "");
            }
            output::line(err, &format!("Run '{command} --help' for usage."));
        }
        CliError::Action(_) | CliError::Registry(_) => output::error(err, e),
    }
    e.exit_code()
}
