//! Workspace-scoped configuration port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ConfigUpdate, ToolchainConfig};

/// Errors that can occur while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be parsed.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A config file could not be read or written.
    #[error("Failed to access {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Source of toolchain configuration for a workspace folder.
///
/// Implementations may layer several sources (user-level defaults,
/// per-workspace files, environment overrides); callers only ever see the
/// effective result.
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Load the effective configuration for `workspace`.
    async fn load(&self, workspace: &Path) -> Result<ToolchainConfig, ConfigError>;

    /// Persist `update` into the workspace-level configuration.
    async fn save(&self, workspace: &Path, update: &ConfigUpdate) -> Result<(), ConfigError>;
}
