//! `tokio::process` implementation of the process execution factory.

use std::process::Stdio;
use std::time::Duration;

use buildrun_core::{
    CommandSpec, ExitReport, LaunchedProcess, OutputSource, ProcessError, ProcessLauncherPort,
};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::spawn_line_reader;

/// How long output may keep flowing after the child exits.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Spawns toolchain processes with piped, line-streamed output.
///
/// Cancellation kills the child. The wait runs on its own task so the kill
/// happens even while the caller is still draining output. Completion tracks
/// the child itself: output left open by a background grandchild is drained
/// for at most half a second after the child exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessLauncher;

impl TokioProcessLauncher {
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessLauncherPort for TokioProcessLauncher {
    fn launch(
        &self,
        spec: &CommandSpec,
        cancel: CancellationToken,
    ) -> Result<LaunchedProcess, ProcessError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.working_dir)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| ProcessError::SpawnFailed {
            program: spec.program.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(pid = ?child.id(), command = %spec.display_line(), "spawned process");

        // Readers stop on cancellation, or once the child has exited and the
        // drain grace period is over (a grandchild may keep the pipes open).
        let readers_stop = cancel.child_token();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_line_reader(
                stdout,
                OutputSource::Stdout,
                tx.clone(),
                readers_stop.clone(),
            ));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_line_reader(
                stderr,
                OutputSource::Stderr,
                tx,
                readers_stop.clone(),
            ));
        }

        let waiter = tokio::spawn(wait_for_exit(child, cancel, readers, readers_stop));
        let completion = Box::pin(async move {
            waiter
                .await
                .map_err(|e| ProcessError::Io(format!("process wait task failed: {e}")))?
        });

        Ok(LaunchedProcess::new(rx, completion))
    }
}

async fn wait_for_exit(
    mut child: Child,
    cancel: CancellationToken,
    readers: Vec<JoinHandle<()>>,
    readers_stop: CancellationToken,
) -> Result<ExitReport, ProcessError> {
    let status = tokio::select! {
        status = child.wait() => status.map_err(|e| ProcessError::Io(e.to_string()))?,
        () = cancel.cancelled() => {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill cancelled process");
            }
            debug!("process killed after cancellation");
            return Err(ProcessError::Cancelled);
        }
    };
    debug!(%status, "process exited");

    let drained = tokio::time::timeout(DRAIN_GRACE, async {
        for reader in readers {
            let _ = reader.await;
        }
    })
    .await;
    if drained.is_err() {
        debug!("output still open after exit, stopping readers");
        readers_stop.cancel();
    }

    if cancel.is_cancelled() {
        return Err(ProcessError::Cancelled);
    }
    Ok(ExitReport {
        code: status.code(),
        success: status.success(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use buildrun_core::{LogLevel, LogSinkPort, NoopProgress, OutputLine, drive};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Instant;

    #[derive(Default)]
    struct RecordingLog(Mutex<Vec<(LogLevel, String)>>);

    impl LogSinkPort for RecordingLog {
        fn record(&self, level: LogLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("/bin/sh", std::env::temp_dir()).args(["-c", script])
    }

    async fn collect(spec: &CommandSpec) -> (Vec<OutputLine>, Result<ExitReport, ProcessError>) {
        let mut process = TokioProcessLauncher::new()
            .launch(spec, CancellationToken::new())
            .unwrap();
        let mut lines = Vec::new();
        while let Some(line) = process.lines.recv().await {
            lines.push(line);
        }
        (lines, process.completion.await)
    }

    #[tokio::test]
    async fn test_streams_stdout_and_stderr() {
        let (lines, report) = collect(&sh("echo one; echo two 1>&2; echo three")).await;

        let report = report.unwrap();
        assert!(report.success);
        assert_eq!(report.code, Some(0));

        let stdout: Vec<_> = lines
            .iter()
            .filter(|l| l.source == OutputSource::Stdout)
            .map(|l| l.text.as_str())
            .collect();
        let stderr: Vec<_> = lines
            .iter()
            .filter(|l| l.source == OutputSource::Stderr)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(stdout, vec!["one", "three"]);
        assert_eq!(stderr, vec!["two"]);
    }

    #[tokio::test]
    async fn test_nonzero_exit_reported() {
        let (_, report) = collect(&sh("exit 3")).await;
        let report = report.unwrap();
        assert!(!report.success);
        assert_eq!(report.code, Some(3));
    }

    #[tokio::test]
    async fn test_env_and_working_dir_applied() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("/bin/sh", dir.path())
            .args(["-c", "echo \"$BUILDRUN_TEST_VAR\"; pwd"])
            .env("BUILDRUN_TEST_VAR", "hello");

        let (lines, report) = collect(&spec).await;
        assert!(report.unwrap().success);
        assert_eq!(lines[0].text, "hello");
        assert_eq!(
            PathBuf::from(&lines[1].text).canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let spec = CommandSpec::new("/nonexistent/buildrun-python", std::env::temp_dir());
        let result = TokioProcessLauncher::new().launch(&spec, CancellationToken::new());
        assert!(matches!(result, Err(ProcessError::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn test_cancellation_kills_child() {
        let cancel = CancellationToken::new();
        let process = TokioProcessLauncher::new()
            .launch(&sh("echo started; sleep 30"), cancel.clone())
            .unwrap();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let log = RecordingLog::default();
        let spec = sh("echo started; sleep 30");
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            drive(&spec, process, &log, &NoopProgress),
        )
        .await
        .expect("cancelled process should not hang");

        assert!(matches!(result, Err(ProcessError::Cancelled)));
    }

    #[tokio::test]
    async fn test_background_grandchild_does_not_hold_completion() {
        let spec = sh("sleep 5 & echo done; exit 0");
        let process = TokioProcessLauncher::new()
            .launch(&spec, CancellationToken::new())
            .unwrap();
        let log = RecordingLog::default();

        let started = Instant::now();
        let report = drive(&spec, process, &log, &NoopProgress).await.unwrap();

        assert!(report.success);
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "completion waited {:?} for the grandchild",
            started.elapsed()
        );
        assert!(log.0.lock().unwrap().contains(&(LogLevel::Info, "done".to_string())));
    }

    #[tokio::test]
    async fn test_drive_logs_stderr_as_error() {
        let spec = sh("echo fine; echo broken 1>&2; exit 1");
        let process = TokioProcessLauncher::new()
            .launch(&spec, CancellationToken::new())
            .unwrap();
        let log = RecordingLog::default();

        let err = drive(&spec, process, &log, &NoopProgress).await.unwrap_err();
        assert!(matches!(err, ProcessError::ExitFailure { .. }));

        let records = log.0.lock().unwrap();
        assert!(records.contains(&(LogLevel::Info, "fine".to_string())));
        assert!(records.contains(&(LogLevel::Error, "broken".to_string())));
    }
}
