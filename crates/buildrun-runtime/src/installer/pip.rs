//! `pip`-backed module installer and interpreter lookup.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use buildrun_core::{
    CommandSpec, InstallerError, LogSinkPort, ModuleInstallerPort, ProcessLauncherPort,
    ProgressReporter, drive, validate_module_name,
};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Exits 0 when `sys.argv[1]` is importable, 1 otherwise.
const FIND_SPEC_SCRIPT: &str =
    "import importlib.util,sys; sys.exit(0 if importlib.util.find_spec(sys.argv[1]) else 1)";

/// Installs the toolchain module with `<interpreter> -m pip install`.
///
/// The install run goes through the same launcher and output forwarding as
/// toolchain runs, so pip's output lands in the log sink and on the display.
pub struct PipModuleInstaller {
    launcher: Arc<dyn ProcessLauncherPort>,
    log: Arc<dyn LogSinkPort>,
    progress: Arc<dyn ProgressReporter>,
}

impl PipModuleInstaller {
    pub fn new(
        launcher: Arc<dyn ProcessLauncherPort>,
        log: Arc<dyn LogSinkPort>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            launcher,
            log,
            progress,
        }
    }
}

#[async_trait]
impl ModuleInstallerPort for PipModuleInstaller {
    async fn is_installed(
        &self,
        interpreter: &Path,
        module: &str,
        cwd: &Path,
    ) -> Result<bool, InstallerError> {
        validate_module_name(module).map_err(|e| InstallerError::InvalidName(e.to_string()))?;

        let output = Command::new(interpreter)
            .arg("-c")
            .arg(FIND_SPEC_SCRIPT)
            .arg(module)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| InstallerError::InterpreterUnavailable {
                path: interpreter.to_path_buf(),
                reason: e.to_string(),
            })?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = stderr.trim();
                Err(InstallerError::CheckFailed {
                    module: module.to_string(),
                    reason: if detail.is_empty() {
                        format!("interpreter exited with {}", output.status)
                    } else {
                        format!("interpreter exited with {}: {detail}", output.status)
                    },
                })
            }
        }
    }

    async fn install(
        &self,
        interpreter: &Path,
        requirement: &str,
        cwd: &Path,
        cancel: CancellationToken,
    ) -> Result<(), InstallerError> {
        let requirement = requirement.trim();
        if requirement.is_empty() || requirement.starts_with('-') {
            return Err(InstallerError::InvalidName(format!(
                "'{requirement}' is not a valid package requirement"
            )));
        }

        let spec = CommandSpec::new(interpreter, cwd)
            .args(["-m", "pip", "install", requirement])
            .env("PYTHONUNBUFFERED", "1");
        info!(%requirement, interpreter = %interpreter.display(), "installing toolchain module");
        debug!(command = %spec.display_line(), "pip command line");

        self.progress.start(&format!("Installing {requirement}"));

        let result = match self.launcher.launch(&spec, cancel) {
            Ok(process) => drive(&spec, process, self.log.as_ref(), self.progress.as_ref()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                self.progress.finish(&format!("Installed {requirement}"));
                Ok(())
            }
            Err(source) => {
                self.progress
                    .finish_with_error(&format!("Failed to install {requirement}"));
                Err(InstallerError::InstallFailed {
                    requirement: requirement.to_string(),
                    source,
                })
            }
        }
    }
}

/// Locate the interpreter the way the OS would when spawning it.
///
/// Bare names are looked up on `PATH`; anything with a directory component
/// must exist as given.
pub fn resolve_interpreter(interpreter: &Path) -> Option<PathBuf> {
    if interpreter.components().count() > 1 || interpreter.is_absolute() {
        return interpreter.is_file().then(|| interpreter.to_path_buf());
    }
    which::which(interpreter).ok()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process::TokioProcessLauncher;
    use buildrun_core::{LogLevel, NoopProgress, OutputLine, ProcessError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLog(Mutex<Vec<(LogLevel, String)>>);

    impl LogSinkPort for RecordingLog {
        fn record(&self, level: LogLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[derive(Default)]
    struct RecordingProgress(Mutex<Vec<String>>);

    impl ProgressReporter for RecordingProgress {
        fn start(&self, title: &str) {
            self.0.lock().unwrap().push(format!("start:{title}"));
        }
        fn line(&self, _line: &OutputLine) {}
        fn finish(&self, message: &str) {
            self.0.lock().unwrap().push(format!("finish:{message}"));
        }
        fn finish_with_error(&self, message: &str) {
            self.0.lock().unwrap().push(format!("error:{message}"));
        }
    }

    fn installer() -> PipModuleInstaller {
        PipModuleInstaller::new(
            Arc::new(TokioProcessLauncher::new()),
            Arc::new(RecordingLog::default()),
            Arc::new(NoopProgress),
        )
    }

    fn tool(name: &str) -> PathBuf {
        which::which(name).unwrap()
    }

    #[tokio::test]
    async fn test_exit_zero_means_installed() {
        let cwd = std::env::temp_dir();
        let installed = installer()
            .is_installed(&tool("true"), "buildrun_toolchain", &cwd)
            .await
            .unwrap();
        assert!(installed);
    }

    #[tokio::test]
    async fn test_exit_one_means_missing() {
        let cwd = std::env::temp_dir();
        let installed = installer()
            .is_installed(&tool("false"), "buildrun_toolchain", &cwd)
            .await
            .unwrap();
        assert!(!installed);
    }

    #[tokio::test]
    async fn test_unexpected_exit_is_check_failure() {
        // A shell cannot parse the Python check and exits with neither 0 nor 1.
        let cwd = std::env::temp_dir();
        let err = installer()
            .is_installed(Path::new("/bin/sh"), "buildrun_toolchain", &cwd)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::CheckFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_unavailable() {
        let cwd = std::env::temp_dir();
        let err = installer()
            .is_installed(Path::new("/nonexistent/python3"), "buildrun_toolchain", &cwd)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::InterpreterUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_module_rejected_before_spawn() {
        let cwd = std::env::temp_dir();
        let err = installer()
            .is_installed(&tool("true"), "os;rm -rf", &cwd)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_install_success_reports_progress() {
        let progress = Arc::new(RecordingProgress::default());
        let installer = PipModuleInstaller::new(
            Arc::new(TokioProcessLauncher::new()),
            Arc::new(RecordingLog::default()),
            progress.clone(),
        );

        installer
            .install(
                &tool("true"),
                "buildrun-toolchain>=1.0",
                &std::env::temp_dir(),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            *progress.0.lock().unwrap(),
            vec![
                "start:Installing buildrun-toolchain>=1.0".to_string(),
                "finish:Installed buildrun-toolchain>=1.0".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_install_failure_wraps_process_error() {
        let err = installer()
            .install(
                &tool("false"),
                "buildrun-toolchain",
                &std::env::temp_dir(),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            InstallerError::InstallFailed {
                requirement,
                source,
            } => {
                assert_eq!(requirement, "buildrun-toolchain");
                assert!(matches!(source, ProcessError::ExitFailure { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_install_rejects_option_like_requirement() {
        let err = installer()
            .install(
                &tool("true"),
                "--index-url=http://evil",
                &std::env::temp_dir(),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::InvalidName(_)));
    }

    #[test]
    fn test_resolve_interpreter() {
        assert!(resolve_interpreter(Path::new("sh")).is_some());
        assert!(resolve_interpreter(Path::new("/bin/sh")).is_some());
        assert!(resolve_interpreter(Path::new("/nonexistent/python3")).is_none());
        assert!(resolve_interpreter(Path::new("buildrun-no-such-interpreter")).is_none());
    }
}
