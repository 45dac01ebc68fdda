//! CLI-specific error types and mappings.
//!
//! Maps `CoreError` onto exit codes and user-facing messages.

use buildrun_core::{CoreError, InstallerError, ProcessError, PromptError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unclassified failure.
    #[error("{0}")]
    Core(String),

    /// Argument or input validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration could not be read, written or validated.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The toolchain or installer process failed.
    #[error("{0}")]
    Process(String),

    /// Confirmation was needed but nobody can answer.
    #[error("{0} (re-run with --yes to install without asking)")]
    PromptRequired(String),

    /// Interrupted with Ctrl+C.
    #[error("Cancelled")]
    Cancelled,

    /// Terminal or serialization I/O failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// - 1: General error
    /// - 2: Invalid arguments
    /// - 71: Process failure (`EX_OSERR`)
    /// - 74: I/O error (`EX_IOERR`)
    /// - 78: Configuration error (`EX_CONFIG`)
    /// - 130: Interrupted
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(_) | Self::PromptRequired(_) => 1,
            Self::Arguments(_) => 2,
            Self::Process(_) => 71,
            Self::Io(_) => 74,
            Self::Config(_) => 78,
            Self::Cancelled => 130,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Process(ProcessError::Cancelled)
            | CoreError::Installer(InstallerError::InstallFailed {
                source: ProcessError::Cancelled,
                ..
            }) => Self::Cancelled,
            CoreError::Process(e) => Self::Process(e.to_string()),
            CoreError::Installer(InstallerError::InvalidName(msg)) => Self::Config(msg),
            CoreError::Installer(e) => Self::Process(e.to_string()),
            CoreError::Config(e) => Self::Config(e.to_string()),
            CoreError::Prompt(PromptError::Required { message }) => {
                Self::PromptRequired(message)
            }
            CoreError::Prompt(e) => Self::Io(e.to_string()),
            CoreError::Validation(msg) => Self::Arguments(msg),
            CoreError::Internal(msg) => Self::Core(msg),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}
