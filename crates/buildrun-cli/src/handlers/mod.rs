//! Command handlers that delegate to `ToolchainService`.
//!
//! Handlers are thin: parse CLI input into domain types, call the service,
//! and format the result for the terminal. They hold no orchestration logic.

pub mod config;
pub mod install;
pub mod status;
pub mod toolchain;

use buildrun_core::AbortReason;

/// One-line explanation printed when a command stopped without running anything.
pub(crate) const fn abort_notice(reason: AbortReason) -> &'static str {
    match reason {
        AbortReason::NoWorkspace => {
            "No workspace selected (pass --workspace or create buildrun.toml); nothing to do."
        }
        AbortReason::InstallDeclined => "Toolchain module not installed; nothing was run.",
    }
}
