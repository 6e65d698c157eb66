use rentmate_config::ConfigError;
use rentmate_core::CoreError;
use thiserror::Error;

/// Unified error for the application layer: services, storage, and configuration.
#[derive(Error, Debug)]
pub enum RentError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RentError {
    /// Message fit for the terminal; storage failures collapse to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            RentError::Core(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Errors that end the shell.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Rent(#[from] RentError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Rent(RentError::Core(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Rent(RentError::Config(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
