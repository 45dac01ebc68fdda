//! Process runtime and OS-level adapters for buildrun.
//!
//! Every type here implements a port from `buildrun_core::ports`:
//!
//! | port | adapter |
//! |------|---------|
//! | `ProcessLauncherPort` | [`TokioProcessLauncher`] |
//! | `ModuleInstallerPort` | [`PipModuleInstaller`] |
//! | `ConfigPort` | [`TomlConfigStore`] |
//! | `WorkspacePort` | [`WorkspaceLocator`] |
//! | `InstallPrompt` | [`CliPrompt`], [`AutoConfirmPrompt`], [`NonInteractivePrompt`] |
//! | `ProgressReporter` | [`CliProgress`] |
//! | `LogSinkPort` | [`TracingLogSink`] |

#![deny(unsafe_code)]

pub mod config_store;
pub mod installer;
pub mod log_sink;
pub mod process;
pub mod progress;
pub mod prompt;
pub mod workspace;

pub use config_store::{TomlConfigStore, USER_CONFIG_FILE, WORKSPACE_CONFIG_FILE};
pub use installer::{PipModuleInstaller, resolve_interpreter};
pub use log_sink::TracingLogSink;
pub use process::TokioProcessLauncher;
pub use progress::CliProgress;
pub use prompt::{AutoConfirmPrompt, CliPrompt, NonInteractivePrompt};
pub use workspace::WorkspaceLocator;
