//! Process execution factory port.
//!
//! A launcher spawns one external process and hands back two things:
//! a push-based receiver that yields output lines as they arrive, and a
//! completion future that resolves when the process ends.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::ProcessError;
use crate::domain::{CommandSpec, ExitReport, OutputLine};

/// Future resolving to the exit report of a launched process.
pub type CompletionFuture = Pin<Box<dyn Future<Output = Result<ExitReport, ProcessError>> + Send>>;

/// A process that has been spawned and is streaming output.
///
/// The line channel closes once output is finished; only then should
/// `completion` be awaited, so that no line is lost. Implementations must
/// close it soon after the process itself exits, even if a background
/// grandchild still holds the output pipes.
pub struct LaunchedProcess {
    /// Output lines in arrival order.
    pub lines: mpsc::UnboundedReceiver<OutputLine>,
    /// Resolves when the process exits, fails, or is cancelled.
    pub completion: CompletionFuture,
}

impl LaunchedProcess {
    pub fn new(lines: mpsc::UnboundedReceiver<OutputLine>, completion: CompletionFuture) -> Self {
        Self { lines, completion }
    }
}

/// Port for spawning external processes.
///
/// Cancellation semantics belong to the implementation: when `cancel` fires,
/// the completion future must resolve to `Err(ProcessError::Cancelled)`.
pub trait ProcessLauncherPort: Send + Sync {
    /// Spawn the command described by `spec`.
    fn launch(
        &self,
        spec: &CommandSpec,
        cancel: CancellationToken,
    ) -> Result<LaunchedProcess, ProcessError>;
}
