//! Domain types for toolchain invocations.
//!
//! Nothing here outlives a single command execution. The types describe what
//! the user asked for ([`Target`], [`Mode`]), what gets spawned
//! ([`CommandSpec`]), what comes back ([`OutputLine`], [`ExitReport`]) and how
//! the invocation ended ([`Outcome`]).

mod command;
mod outcome;
mod target;

pub use command::{CommandSpec, ExitReport, OutputLine, OutputSource};
pub use outcome::{AbortReason, Outcome, ToolchainStatus};
pub use target::{Mode, Target};
