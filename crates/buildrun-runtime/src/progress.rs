//! Terminal display for toolchain runs.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use buildrun_core::{OutputLine, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner with the toolchain's output printed above it.
///
/// Stdout lines go to stdout unchanged; stderr lines go to stderr with a
/// `stderr:` prefix. Printing suspends the spinner so lines never interleave
/// with it, and still works when the spinner is hidden (not a terminal).
pub struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub const fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    fn bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CliProgress {
    fn start(&self, title: &str) {
        let pb = Self::create_spinner();
        pb.set_message(title.to_string());
        if let Some(previous) = self.bar().replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn line(&self, line: &OutputLine) {
        let print = || {
            if line.source.is_error() {
                eprintln!("stderr: {}", line.text);
            } else {
                println!("{}", line.text);
            }
        };
        match self.bar().as_ref() {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }

    fn finish(&self, message: &str) {
        if let Some(pb) = self.bar().take() {
            pb.finish_with_message(format!("✓ {message}"));
        }
    }

    fn finish_with_error(&self, message: &str) {
        if let Some(pb) = self.bar().take() {
            pb.abandon_with_message(format!("✗ {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_without_terminal_does_not_panic() {
        let progress = CliProgress::new();
        progress.line(&OutputLine::stdout("before start"));
        progress.start("Building app");
        progress.line(&OutputLine::stdout("compiling"));
        progress.line(&OutputLine::stderr("warning: unused"));
        progress.finish("build app finished");
        assert!(progress.bar().is_none());

        progress.start("Running app");
        progress.finish_with_error("run app failed");
        assert!(progress.bar().is_none());
    }

    #[test]
    fn test_finish_without_start_is_noop() {
        let progress = CliProgress::default();
        progress.finish("nothing");
        progress.finish_with_error("nothing");
    }
}
