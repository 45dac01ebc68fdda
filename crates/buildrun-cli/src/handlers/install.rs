//! `buildrun install`.

use buildrun_core::Outcome;
use tokio_util::sync::CancellationToken;

use super::abort_notice;
use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, cancel: CancellationToken) -> Result<(), CliError> {
    match ctx.service().install(cancel).await? {
        Outcome::Completed => println!("✓ Toolchain module is installed."),
        Outcome::Aborted(reason) => eprintln!("{}", abort_notice(reason)),
    }
    Ok(())
}
