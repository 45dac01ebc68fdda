//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that the orchestration layer expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` or filesystem types in any signature
//! - No terminal/CLI concerns: prompts and progress are traits too
//! - Every collaborator can be replaced by an in-memory fake in tests

pub mod config_store;
pub mod log_sink;
pub mod module_installer;
pub mod process_launcher;
pub mod progress;
pub mod prompt;
pub mod workspace;

use thiserror::Error;

pub use config_store::{ConfigError, ConfigPort};
pub use log_sink::{LogLevel, LogSinkPort};
pub use module_installer::{InstallerError, ModuleInstallerPort};
pub use process_launcher::{CompletionFuture, LaunchedProcess, ProcessLauncherPort};
pub use progress::{NoopProgress, ProgressReporter};
pub use prompt::{InstallPrompt, PromptError};
pub use workspace::WorkspacePort;

/// Domain-specific errors for process execution.
///
/// This error type abstracts away process management implementation details
/// and provides a clean interface for services to handle process failures.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The process could not be started.
    #[error("Failed to start {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    /// The process ran and exited unsuccessfully.
    #[error("{command} failed with {report}")]
    ExitFailure {
        command: String,
        report: crate::domain::ExitReport,
    },

    /// The operation was cancelled before the process finished.
    #[error("Operation cancelled")]
    Cancelled,

    /// Waiting on or reading from the process failed.
    #[error("I/O error while running process: {0}")]
    Io(String),
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters map it to their own error types (CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Process execution failed.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Module check or installation failed.
    #[error(transparent)]
    Installer(#[from] InstallerError),

    /// Configuration could not be read, written or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// User interaction failed or was unavailable.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}
