//! Command result plumbing shared by the shell and every handler.

use std::io;

use rentmate_config::ConfigError;
use rentmate_core::CoreError;
use thiserror::Error;

use crate::errors::{CliError, RentError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Please sign in first.")]
    NotSignedIn,
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {usage}"))
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => CommandError::NotSignedIn,
            other => CommandError::Core(other),
        }
    }
}

impl From<RentError> for CommandError {
    fn from(err: RentError) -> Self {
        match err {
            RentError::Core(inner) => inner.into(),
            RentError::Config(inner) => CommandError::Config(inner),
            RentError::Io(inner) => CommandError::Io(inner),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}
