//! Toolchain orchestration service.
//!
//! One `execute` call runs one toolchain subcommand end to end: select the
//! workspace, load its configuration, make sure the toolchain module is
//! installed, then spawn the toolchain and stream its output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{ConfigUpdate, ToolchainConfig};
use crate::domain::{AbortReason, CommandSpec, ExitReport, Mode, Outcome, Target, ToolchainStatus};
use crate::ports::{
    ConfigPort, CoreError, InstallPrompt, LogLevel, LogSinkPort, ModuleInstallerPort,
    ProcessError, ProcessLauncherPort, ProgressReporter, WorkspacePort,
};
use crate::stream::drive;

/// Container for every collaborator the service needs.
///
/// Adapters fill this in at their composition root.
#[derive(Clone)]
pub struct ToolchainDeps {
    pub workspace: Arc<dyn WorkspacePort>,
    pub config: Arc<dyn ConfigPort>,
    pub installer: Arc<dyn ModuleInstallerPort>,
    pub prompt: Arc<dyn InstallPrompt>,
    pub launcher: Arc<dyn ProcessLauncherPort>,
    pub log: Arc<dyn LogSinkPort>,
    pub progress: Arc<dyn ProgressReporter>,
}

/// Orchestrates build/run invocations of the external toolchain.
pub struct ToolchainService {
    deps: ToolchainDeps,
}

impl ToolchainService {
    pub const fn new(deps: ToolchainDeps) -> Self {
        Self { deps }
    }

    /// Run `<interpreter> <toolchain-args...> {build|run} <target>`.
    ///
    /// Returns `Ok(Outcome::Aborted(_))` without spawning anything when no
    /// workspace is selected or the user declines the module install.
    /// A failing toolchain run is logged at error level and returned as
    /// `Err(CoreError::Process(_))`; it is never retried.
    pub async fn execute(
        &self,
        mode: Mode,
        target: &Target,
        cancel: CancellationToken,
    ) -> Result<Outcome, CoreError> {
        let Some(workspace) = self.deps.workspace.current_folder() else {
            debug!(%mode, %target, "no workspace folder selected, nothing to do");
            return Ok(Outcome::Aborted(AbortReason::NoWorkspace));
        };

        let config = self.load_config(&workspace).await?;

        if !self
            .ensure_module(&config, &workspace, cancel.clone(), true)
            .await?
        {
            return Ok(Outcome::Aborted(AbortReason::InstallDeclined));
        }

        let spec = config.command_for(mode, target, &workspace);
        info!(%mode, %target, workspace = %workspace.display(), "invoking toolchain");
        debug!(command = %spec.display_line(), "toolchain command line");

        self.deps
            .progress
            .start(&format!("{} {target}", mode.progress_label()));

        match self.run_streaming(&spec, cancel).await {
            Ok(report) => {
                debug!(%report, "toolchain finished");
                self.deps
                    .progress
                    .finish(&format!("{mode} {target} finished"));
                Ok(Outcome::Completed)
            }
            Err(err) => {
                let message = format!("{mode} {target} failed: {err}");
                self.deps.log.record(LogLevel::Error, &message);
                self.deps.progress.finish_with_error(&message);
                Err(err.into())
            }
        }
    }

    /// Install the toolchain module without asking, if it is missing.
    pub async fn install(&self, cancel: CancellationToken) -> Result<Outcome, CoreError> {
        let Some(workspace) = self.deps.workspace.current_folder() else {
            debug!("no workspace folder selected, skipping install");
            return Ok(Outcome::Aborted(AbortReason::NoWorkspace));
        };

        let config = self.load_config(&workspace).await?;
        self.ensure_module(&config, &workspace, cancel, false)
            .await?;
        Ok(Outcome::Completed)
    }

    /// Report the workspace, effective config and module state, without prompting.
    pub async fn status(&self) -> Result<Option<ToolchainStatus>, CoreError> {
        let Some(workspace) = self.deps.workspace.current_folder() else {
            return Ok(None);
        };

        let config = self.load_config(&workspace).await?;
        let module_installed = self
            .deps
            .installer
            .is_installed(&config.interpreter, &config.module, &workspace)
            .await?;

        Ok(Some(ToolchainStatus {
            workspace,
            config,
            module_installed,
        }))
    }

    /// Effective configuration for the selected workspace.
    pub async fn config(&self) -> Result<Option<(PathBuf, ToolchainConfig)>, CoreError> {
        let Some(workspace) = self.deps.workspace.current_folder() else {
            return Ok(None);
        };
        let config = self.deps.config.load(&workspace).await?;
        Ok(Some((workspace, config)))
    }

    /// Persist `update` into the workspace config and return the new effective config.
    pub async fn update_config(
        &self,
        update: &ConfigUpdate,
    ) -> Result<Option<ToolchainConfig>, CoreError> {
        let Some(workspace) = self.deps.workspace.current_folder() else {
            return Ok(None);
        };

        if update.is_empty() {
            return Err(CoreError::Validation("no configuration change given".to_string()));
        }

        let mut proposed = self.deps.config.load(&workspace).await?;
        proposed.merge(update);
        proposed.validate()?;

        self.deps.config.save(&workspace, update).await?;
        let config = self.load_config(&workspace).await?;
        info!(workspace = %workspace.display(), "configuration updated");
        Ok(Some(config))
    }

    // ------------------------------------------------------------------------
    // Internal methods
    // ------------------------------------------------------------------------

    async fn load_config(&self, workspace: &Path) -> Result<ToolchainConfig, CoreError> {
        let config = self.deps.config.load(workspace).await?;
        config.validate()?;
        Ok(config)
    }

    /// Returns `Ok(false)` when the module is missing and the user declined.
    async fn ensure_module(
        &self,
        config: &ToolchainConfig,
        workspace: &Path,
        cancel: CancellationToken,
        ask: bool,
    ) -> Result<bool, CoreError> {
        let installed = self
            .deps
            .installer
            .is_installed(&config.interpreter, &config.module, workspace)
            .await?;
        if installed {
            debug!(module = %config.module, "toolchain module already installed");
            return Ok(true);
        }

        let requirement = config.requirement();
        if ask {
            let question = format!(
                "The toolchain module '{}' is not installed for {}. Install '{requirement}' now?",
                config.module,
                config.interpreter.display()
            );
            if !self.confirm_install(question, &cancel).await? {
                debug!(module = %config.module, "module install declined");
                return Ok(false);
            }
        }
        if cancel.is_cancelled() {
            return Err(ProcessError::Cancelled.into());
        }

        self.deps.prompt.info(&format!(
            "Installing {requirement} into {}...",
            config.interpreter.display()
        ));

        if let Err(err) = self
            .deps
            .installer
            .install(&config.interpreter, requirement, workspace, cancel)
            .await
        {
            self.deps.log.record(LogLevel::Error, &err.to_string());
            return Err(err.into());
        }

        info!(%requirement, "toolchain module installed");
        Ok(true)
    }

    /// Ask on a blocking thread so that cancellation is not held up by a
    /// prompt waiting on stdin.
    async fn confirm_install(
        &self,
        question: String,
        cancel: &CancellationToken,
    ) -> Result<bool, CoreError> {
        let prompt = Arc::clone(&self.deps.prompt);
        let answer = tokio::task::spawn_blocking(move || prompt.confirm(&question, true));
        tokio::select! {
            answer = answer => {
                let answer = answer
                    .map_err(|e| CoreError::Internal(format!("install prompt task failed: {e}")))?;
                Ok(answer?)
            }
            () = cancel.cancelled() => {
                debug!("cancelled while waiting for install confirmation");
                Err(ProcessError::Cancelled.into())
            }
        }
    }

    async fn run_streaming(
        &self,
        spec: &CommandSpec,
        cancel: CancellationToken,
    ) -> Result<ExitReport, ProcessError> {
        let process = self.deps.launcher.launch(spec, cancel)?;
        drive(
            spec,
            process,
            self.deps.log.as_ref(),
            self.deps.progress.as_ref(),
        )
        .await
    }
}
