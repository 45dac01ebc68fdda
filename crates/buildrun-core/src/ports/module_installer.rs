//! Module installer port.
//!
//! Checks for, and installs, the toolchain module inside the environment of a
//! given interpreter.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::ProcessError;

/// Errors that can occur while checking or installing a module.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The interpreter could not be started at all.
    #[error("Interpreter {path} is not available: {reason}")]
    InterpreterUnavailable { path: PathBuf, reason: String },

    /// The installation check produced an unexpected result.
    #[error("Could not determine whether '{module}' is installed: {reason}")]
    CheckFailed { module: String, reason: String },

    /// The installer process failed.
    #[error("Failed to install '{requirement}': {source}")]
    InstallFailed {
        requirement: String,
        #[source]
        source: ProcessError,
    },

    /// The module name or requirement is not acceptable.
    #[error("Invalid module name: {0}")]
    InvalidName(String),
}

/// Port for the module installer.
#[async_trait]
pub trait ModuleInstallerPort: Send + Sync {
    /// Whether `module` can be imported by `interpreter` when run in `cwd`.
    async fn is_installed(
        &self,
        interpreter: &Path,
        module: &str,
        cwd: &Path,
    ) -> Result<bool, InstallerError>;

    /// Install `requirement` into the environment of `interpreter`.
    async fn install(
        &self,
        interpreter: &Path,
        requirement: &str,
        cwd: &Path,
        cancel: CancellationToken,
    ) -> Result<(), InstallerError>;
}
