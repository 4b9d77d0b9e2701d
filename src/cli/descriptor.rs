//! Command descriptors: one node of the command tree

use std::fmt;

use clap::Arg;

use crate::cli::dispatch::Context;
use crate::cli::error::ActionResult;

/// Executable body of a command.
pub type Action = Box<dyn Fn(&mut Context<'_>) -> ActionResult>;

/// Describes one command: its invocation token, help texts, declared
/// arguments, optional action and ordered children.
///
/// A descriptor without an action is a grouping node; selecting it prints
/// its help.
pub struct CommandDescriptor {
    name: String,
    about: String,
    long_about: Option<String>,
    version: Option<String>,
    args: Vec<Arg>,
    action: Option<Action>,
    children: Vec<CommandDescriptor>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
            long_about: None,
            version: None,
            args: Vec::new(),
            action: None,
            children: Vec::new(),
        }
    }

    pub fn long_about(mut self, text: impl Into<String>) -> Self {
        self.long_about = Some(text.into());
        self
    }

    /// Enable `-V/--version` on this command.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Declare a flag or positional. Flags marked `global(true)` are
    /// accepted by every descendant as well.
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> ActionResult + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn subcommand(mut self, child: CommandDescriptor) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn get_long_about(&self) -> Option<&str> {
        self.long_about.as_deref()
    }

    pub fn get_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn global_args(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter().filter(|a| a.is_global_set())
    }

    pub fn get_action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn is_group(&self) -> bool {
        self.action.is_none()
    }

    pub fn children(&self) -> &[CommandDescriptor] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&CommandDescriptor> {
        self.children.iter().find(|c| c.name == name)
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<CommandDescriptor> {
        &mut self.children
    }

    /// Look up a flag token (`--name`, `--name=value`, `-n`, `-nvalue`) among
    /// this command's declared args.
    pub(crate) fn find_flag(&self, token: &str) -> Option<&Arg> {
        if let Some(long) = token.strip_prefix("--") {
            let long = long.split_once('=').map_or(long, |(name, _)| name);
            return self.args.iter().find(|a| a.get_long() == Some(long));
        }
        let short = token.strip_prefix('-')?.chars().next()?;
        self.find_short(short)
    }

    pub(crate) fn find_short(&self, short: char) -> Option<&Arg> {
        self.args.iter().find(|a| a.get_short() == Some(short))
    }

    /// Names of children close to `token`, for "did you mean" hints.
    pub fn suggestions_for(&self, token: &str) -> Vec<String> {
        self.children
            .iter()
            .filter(|c| c.name.starts_with(token) || edit_distance(&c.name, token) <= 2)
            .map(|c| c.name.clone())
            .collect()
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("about", &self.about)
            .field("has_action", &self.action.is_some())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut cur = Vec::with_capacity(b.len() + 1);
        cur.push(i + 1);
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            cur.push((prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1));
        }
        prev = cur;
    }
    prev[b.len()]
}
