//! Progress reporting abstraction for toolchain operations.
//!
//! This is the display surface: the CLI renders a spinner with output lines
//! printed above it, tests record calls, and `NoopProgress` ignores them.

use crate::domain::OutputLine;

/// Trait for receiving progress updates during long-running operations.
pub trait ProgressReporter: Send + Sync {
    /// Called when an operation starts (e.g., "Building esp32-devkit").
    fn start(&self, title: &str);

    /// Called for every output line, in arrival order.
    fn line(&self, line: &OutputLine);

    /// Called when the operation completes successfully.
    fn finish(&self, message: &str);

    /// Called when the operation fails.
    fn finish_with_error(&self, message: &str);
}

/// A no-op progress reporter that ignores all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _title: &str) {}
    fn line(&self, _line: &OutputLine) {}
    fn finish(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}
