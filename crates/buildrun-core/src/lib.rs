//! Core domain types, port definitions and orchestration for buildrun.
//!
//! buildrun drives an external, Python-hosted build toolchain:
//!
//! 1. pick the workspace folder,
//! 2. make sure the toolchain module is installed (asking first),
//! 3. spawn `<interpreter> <toolchain-args...> {build|run} <target>`,
//! 4. forward each output line to a log sink and a display surface.
//!
//! This crate owns the pieces that do not touch the OS. Process spawning,
//! config files and terminal I/O live behind the traits in [`ports`] and are
//! implemented by `buildrun-runtime`.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
pub mod stream;

// Re-export commonly used types for convenience
pub use config::{
    ConfigKey, ConfigUpdate, DEFAULT_INTERPRETER, DEFAULT_TOOLCHAIN_MODULE, ToolchainConfig,
    validate_module_name,
};
pub use domain::{
    AbortReason, CommandSpec, ExitReport, Mode, Outcome, OutputLine, OutputSource, Target,
    ToolchainStatus,
};
pub use ports::{
    ConfigError, ConfigPort, CoreError, InstallPrompt, InstallerError, LaunchedProcess, LogLevel,
    LogSinkPort, ModuleInstallerPort, NoopProgress, ProcessError, ProcessLauncherPort,
    ProgressReporter, PromptError, WorkspacePort,
};
pub use services::{ToolchainDeps, ToolchainService};
pub use stream::drive;
