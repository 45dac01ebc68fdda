//! CLI bootstrap - the composition root.
//!
//! This is the only place where runtime adapters are instantiated and
//! handed to the core `ToolchainService`. Handlers receive the composed
//! [`CliContext`] and never construct adapters themselves.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use buildrun_core::{
    InstallPrompt, LogSinkPort, ProcessLauncherPort, ProgressReporter, ToolchainDeps,
    ToolchainService,
};
use buildrun_runtime::{
    AutoConfirmPrompt, CliProgress, CliPrompt, NonInteractivePrompt, PipModuleInstaller,
    TokioProcessLauncher, TomlConfigStore, TracingLogSink, WorkspaceLocator,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit workspace folder (`--workspace` / `BUILDRUN_WORKSPACE`).
    pub workspace: Option<PathBuf>,
    /// Install without asking (`--yes`).
    pub assume_yes: bool,
    /// Whether stdin is attached to a terminal.
    pub interactive: bool,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            workspace: cli.workspace.clone(),
            assume_yes: cli.yes,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    /// Prompt matching how the CLI was started.
    pub fn prompt(&self) -> Arc<dyn InstallPrompt> {
        if self.assume_yes {
            Arc::new(AutoConfirmPrompt)
        } else if self.interactive {
            Arc::new(CliPrompt::new())
        } else {
            Arc::new(NonInteractivePrompt)
        }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The toolchain orchestration service.
    pub service: ToolchainService,
    /// User-level config file, shown by `status`.
    pub user_config: Option<PathBuf>,
}

impl CliContext {
    pub const fn service(&self) -> &ToolchainService {
        &self.service
    }
}

/// Wire the production adapters together.
pub fn bootstrap(config: &CliConfig) -> CliContext {
    let launcher: Arc<dyn ProcessLauncherPort> = Arc::new(TokioProcessLauncher::new());
    let log: Arc<dyn LogSinkPort> = Arc::new(TracingLogSink);
    let progress: Arc<dyn ProgressReporter> = Arc::new(CliProgress::new());
    let store = TomlConfigStore::new();
    let user_config = store.user_config_path().map(PathBuf::from);

    debug!(
        workspace = ?config.workspace,
        assume_yes = config.assume_yes,
        interactive = config.interactive,
        "bootstrapping CLI"
    );

    let deps = ToolchainDeps {
        workspace: Arc::new(WorkspaceLocator::new(config.workspace.clone())),
        config: Arc::new(store),
        installer: Arc::new(PipModuleInstaller::new(
            launcher.clone(),
            log.clone(),
            progress.clone(),
        )),
        prompt: config.prompt(),
        launcher,
        log,
        progress,
    };

    bootstrap_with(deps, user_config)
}

/// Compose a context from caller-supplied ports (for testing).
pub fn bootstrap_with(deps: ToolchainDeps, user_config: Option<PathBuf>) -> CliContext {
    CliContext {
        service: ToolchainService::new(deps),
        user_config,
    }
}

/// Token cancelled on the first Ctrl+C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("Ctrl+C received, cancelling");
                trigger.cancel();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl+C"),
        }
    });
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildrun_core::PromptError;

    #[test]
    fn test_yes_flag_auto_confirms() {
        let config = CliConfig {
            assume_yes: true,
            ..CliConfig::default()
        };
        assert!(config.prompt().confirm("Install?", false).unwrap());
    }

    #[test]
    fn test_non_interactive_refuses_to_guess() {
        let config = CliConfig::default();
        assert!(matches!(
            config.prompt().confirm("Install?", true),
            Err(PromptError::Required { .. })
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_without_workspace_aborts_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            workspace: Some(dir.path().join("missing")),
            ..CliConfig::default()
        };
        let ctx = bootstrap(&config);
        assert!(ctx.service().status().await.unwrap().is_none());
    }
}
