//! `buildrun build` / `buildrun run`.

use buildrun_core::{Mode, Outcome, Target};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::abort_notice;
use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(
    ctx: &CliContext,
    mode: Mode,
    target: &str,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let target = Target::new(target)?;
    match ctx.service().execute(mode, &target, cancel).await? {
        Outcome::Completed => Ok(()),
        Outcome::Aborted(reason) => {
            debug!(?reason, %mode, %target, "toolchain invocation aborted");
            eprintln!("{}", abort_notice(reason));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};

    fn context_without_workspace() -> (tempfile::TempDir, CliContext) {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            workspace: Some(dir.path().join("missing")),
            ..CliConfig::default()
        };
        let ctx = bootstrap(&config);
        (dir, ctx)
    }

    #[tokio::test]
    async fn test_blank_target_is_argument_error() {
        let (_dir, ctx) = context_without_workspace();
        let err = execute(&ctx, Mode::Build, "   ", CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_missing_workspace_succeeds_quietly() {
        let (_dir, ctx) = context_without_workspace();
        execute(&ctx, Mode::Run, "board-a", CancellationToken::new())
            .await
            .unwrap();
    }
}
