//! Install confirmation prompts.
//!
//! Which prompt the CLI wires in depends on how it was started:
//! `--yes` gets [`AutoConfirmPrompt`], an interactive terminal gets
//! [`CliPrompt`], and anything else gets [`NonInteractivePrompt`].

use std::io::{self, BufRead, Write};

use buildrun_core::{InstallPrompt, PromptError};

/// Non-interactive prompt that refuses to guess.
///
/// Every confirmation fails with `PromptError::Required` carrying the
/// question, so scripted runs stop instead of installing silently.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompt;

impl InstallPrompt for NonInteractivePrompt {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool, PromptError> {
        Err(PromptError::required(message))
    }

    fn info(&self, _message: &str) {}
}

/// Prompt that answers yes to everything (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirmPrompt;

impl InstallPrompt for AutoConfirmPrompt {
    fn confirm(&self, _message: &str, _default: bool) -> Result<bool, PromptError> {
        Ok(true)
    }

    fn info(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Interactive prompt on stdin.
///
/// Questions go to stderr so stdout stays clean for toolchain output.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliPrompt;

impl CliPrompt {
    pub const fn new() -> Self {
        Self
    }
}

impl InstallPrompt for CliPrompt {
    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        let mut stderr = io::stderr();
        write!(stderr, "{message} {suffix}: ")?;
        stderr.flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            // EOF: nobody is there to answer
            return Ok(false);
        }
        Ok(parse_answer(&input, default))
    }

    fn info(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Interpret a `[Y/n]` answer. Unknown input falls back to `default`.
fn parse_answer(input: &str, default: bool) -> bool {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}
