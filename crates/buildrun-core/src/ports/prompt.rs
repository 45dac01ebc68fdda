//! User prompt abstraction for install confirmations.
//!
//! This port allows CLI and non-interactive adapters to handle user
//! confirmations without coupling the orchestration to specific I/O.

use thiserror::Error;

/// Errors that can occur while prompting.
#[derive(Debug, Error)]
pub enum PromptError {
    /// User confirmation was required but not available (non-interactive mode).
    #[error("User confirmation required: {message}")]
    Required { message: String },

    /// Reading the answer failed.
    #[error("Failed to read user input: {0}")]
    Io(#[from] std::io::Error),
}

impl PromptError {
    /// Create a `Required` error with a message.
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: message.into(),
        }
    }
}

/// Trait for handling user prompts during installation.
///
/// Implementors can prompt on stdin, auto-confirm, or return errors
/// for non-interactive contexts.
pub trait InstallPrompt: Send + Sync {
    /// Ask the user to confirm an action.
    ///
    /// # Returns
    /// - `Ok(true)` if the user confirmed
    /// - `Ok(false)` if the user declined
    /// - `Err(PromptError::Required)` if prompting is not supported
    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;

    /// Display an informational message to the user.
    fn info(&self, message: &str);
}
