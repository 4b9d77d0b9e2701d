//! CLI-level errors

use thiserror::Error;

use crate::config::SettingsError;
use crate::exitcode;

/// Failure reported by a command action.
///
/// The message is shown to the user verbatim, without a usage hint.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ActionError {
    message: String,
    exit_code: i32,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: exitcode::FAILURE,
            source: None,
        }
    }

    /// Attach an underlying cause; the message stays what the user sees.
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl From<std::io::Error> for ActionError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
            .with_exit_code(exitcode::IOERR)
            .with_source(e)
    }
}

impl From<SettingsError> for ActionError {
    fn from(e: SettingsError) -> Self {
        Self::new(e.to_string())
            .with_exit_code(exitcode::CONFIG)
            .with_source(e)
    }
}

/// Result type for command actions.
pub type ActionResult = Result<(), ActionError>;

/// Problems found while validating a command tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate command \"{name}\" under \"{parent}\"")]
    DuplicateCommand { parent: String, name: String },

    #[error("invalid command name {name:?} under \"{parent}\": {reason}")]
    InvalidName {
        parent: String,
        name: String,
        reason: &'static str,
    },

    #[error("argument \"{arg}\" of \"{command}\" clashes with global argument \"{global}\": {reason}")]
    ConflictingArg {
        command: String,
        arg: String,
        global: String,
        reason: &'static str,
    },
}

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("unknown command \"{token}\" for \"{command}\"")]
    UnknownCommand {
        token: String,
        command: String,
        suggestions: Vec<String>,
    },

    #[error(transparent)]
    Parse(#[from] clap::Error),

    #[error("{0}")]
    Action(#[from] ActionError),

    #[error("{0}")]
    Registry(#[from] RegistryError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnknownCommand { .. } | CliError::Parse(_) => exitcode::USAGE,
            CliError::Action(e) => e.exit_code(),
            CliError::Registry(_) => exitcode::SOFTWARE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_plain_action_error_when_exit_code_then_failure() {
        let err = CliError::from(ActionError::new("boom"));
        assert_eq!(err.exit_code(), exitcode::FAILURE);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn given_io_error_when_converted_then_keeps_source_and_ioerr() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ActionError::from(io);
        assert_eq!(err.exit_code(), exitcode::IOERR);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn given_unknown_command_when_displayed_then_names_token_and_command() {
        let err = CliError::UnknownCommand {
            token: "frobnicate".into(),
            command: "mcd".into(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), r#"unknown command "frobnicate" for "mcd""#);
        assert_eq!(err.exit_code(), exitcode::USAGE);
    }
}
