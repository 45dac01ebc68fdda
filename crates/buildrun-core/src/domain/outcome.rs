//! Invocation outcomes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ToolchainConfig;

/// Why an invocation stopped before spawning the toolchain.
///
/// Both reasons are recoverable: the caller is expected to finish quietly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// No workspace folder is selected.
    NoWorkspace,
    /// The toolchain module is missing and the user declined to install it.
    InstallDeclined,
}

/// Result of a build/run/install request that did not fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "reason")]
pub enum Outcome {
    Completed,
    Aborted(AbortReason),
}

/// Snapshot reported by `buildrun status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainStatus {
    pub workspace: PathBuf,
    pub config: ToolchainConfig,
    pub module_installed: bool,
}
