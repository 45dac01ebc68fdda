//! Forwarding of launched-process output to the log sink and display.

use tracing::debug;

use crate::domain::{CommandSpec, ExitReport};
use crate::ports::{LaunchedProcess, LogLevel, LogSinkPort, ProcessError, ProgressReporter};

/// Drain `process`'s output and wait for it to finish.
///
/// Every line is recorded in `log` (`Error` for stderr, `Info` otherwise) and
/// then shown on `display`, in arrival order. Once the output channel closes
/// the completion future is awaited; an unsuccessful exit status becomes
/// [`ProcessError::ExitFailure`].
pub async fn drive(
    spec: &CommandSpec,
    process: LaunchedProcess,
    log: &dyn LogSinkPort,
    display: &dyn ProgressReporter,
) -> Result<ExitReport, ProcessError> {
    let LaunchedProcess {
        mut lines,
        completion,
    } = process;

    let mut forwarded = 0usize;
    while let Some(line) = lines.recv().await {
        let level = if line.source.is_error() {
            LogLevel::Error
        } else {
            LogLevel::Info
        };
        log.record(level, &line.text);
        display.line(&line);
        forwarded += 1;
    }
    debug!(lines = forwarded, "process output closed");

    let report = completion.await?;
    if report.success {
        Ok(report)
    } else {
        Err(ProcessError::ExitFailure {
            command: spec.display_line(),
            report,
        })
    }
}
