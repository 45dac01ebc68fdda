//! TOML-backed, layered toolchain configuration.
//!
//! Layers, lowest to highest precedence:
//!
//! 1. built-in defaults ([`ToolchainConfig::default`])
//! 2. the user file, `<config_dir>/buildrun/config.toml`
//! 3. the workspace file, `<workspace>/buildrun.toml`
//! 4. `BUILDRUN_INTERPRETER`, `BUILDRUN_TOOLCHAIN_PATH`, `BUILDRUN_MODULE`,
//!    `BUILDRUN_PACKAGE`
//!
//! Only the workspace file is ever written.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use buildrun_core::{ConfigError, ConfigPort, ConfigUpdate, ToolchainConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Workspace configuration file name. Its presence also marks a workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = "buildrun.toml";

/// User configuration file, relative to the platform config directory.
pub const USER_CONFIG_FILE: &str = "buildrun/config.toml";

const ENV_INTERPRETER: &str = "BUILDRUN_INTERPRETER";
const ENV_TOOLCHAIN_PATH: &str = "BUILDRUN_TOOLCHAIN_PATH";
const ENV_MODULE: &str = "BUILDRUN_MODULE";
const ENV_PACKAGE: &str = "BUILDRUN_PACKAGE";

/// On-disk shape of a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    interpreter: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "toolchain_path")]
    toolchain_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "extra_args")]
    extra_args: Option<Vec<String>>,
}

impl ConfigFile {
    /// Overlay the values this file sets onto `config`.
    fn apply_to(self, config: &mut ToolchainConfig) {
        if let Some(interpreter) = self.interpreter {
            config.interpreter = interpreter;
        }
        if let Some(path) = self.toolchain_path {
            config.toolchain_path = Some(path);
        }
        if let Some(module) = self.module {
            config.module = module;
        }
        if let Some(package) = self.package {
            config.package = Some(package);
        }
        if let Some(args) = self.extra_args {
            config.extra_args = args;
        }
    }

    /// Record `update` in the file. Resetting a key removes it.
    fn merge(&mut self, update: &ConfigUpdate) {
        if let Some(ref interpreter) = update.interpreter {
            self.interpreter.clone_from(interpreter);
        }
        if let Some(ref path) = update.toolchain_path {
            self.toolchain_path.clone_from(path);
        }
        if let Some(ref module) = update.module {
            self.module.clone_from(module);
        }
        if let Some(ref package) = update.package {
            self.package.clone_from(package);
        }
        if let Some(ref args) = update.extra_args {
            self.extra_args = (!args.is_empty()).then(|| args.clone());
        }
    }
}

/// [`ConfigPort`] adapter reading user and workspace TOML files.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    user_config: Option<PathBuf>,
    read_env: bool,
}

impl Default for TomlConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlConfigStore {
    /// Store using the platform user config file and environment overrides.
    pub fn new() -> Self {
        Self {
            user_config: dirs::config_dir().map(|dir| dir.join(USER_CONFIG_FILE)),
            read_env: true,
        }
    }

    /// Replace the user-level config file (`None` disables that layer).
    #[must_use]
    pub fn with_user_config(mut self, path: Option<PathBuf>) -> Self {
        self.user_config = path;
        self
    }

    /// Skip the environment variable layer.
    #[must_use]
    pub const fn ignore_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Path of the user-level config file, if any.
    pub fn user_config_path(&self) -> Option<&Path> {
        self.user_config.as_deref()
    }

    /// Path of the workspace config file for `workspace`.
    pub fn workspace_config_path(workspace: &Path) -> PathBuf {
        workspace.join(WORKSPACE_CONFIG_FILE)
    }
}

#[async_trait]
impl ConfigPort for TomlConfigStore {
    async fn load(&self, workspace: &Path) -> Result<ToolchainConfig, ConfigError> {
        let mut config = ToolchainConfig::default();

        if let Some(user) = &self.user_config
            && let Some(file) = read_config_file(user).await?
        {
            debug!(path = %user.display(), "applying user config");
            file.apply_to(&mut config);
        }

        let ws_path = Self::workspace_config_path(workspace);
        if let Some(file) = read_config_file(&ws_path).await? {
            debug!(path = %ws_path.display(), "applying workspace config");
            file.apply_to(&mut config);
        }

        if self.read_env {
            apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        }

        resolve_relative_paths(&mut config, workspace);
        Ok(config)
    }

    async fn save(&self, workspace: &Path, update: &ConfigUpdate) -> Result<(), ConfigError> {
        let path = Self::workspace_config_path(workspace);
        let mut file = read_config_file(&path).await?.unwrap_or_default();
        file.merge(update);

        let content = toml::to_string_pretty(&file).map_err(|e| ConfigError::Io {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), "workspace config saved");
        Ok(())
    }
}

/// Read and parse `path`. A missing file is `Ok(None)`.
async fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Apply `BUILDRUN_*` overrides. Empty values are ignored.
fn apply_env_overrides(config: &mut ToolchainConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(interpreter) = get(ENV_INTERPRETER) {
        config.interpreter = PathBuf::from(interpreter);
    }
    if let Some(path) = get(ENV_TOOLCHAIN_PATH) {
        config.toolchain_path = Some(PathBuf::from(path));
    }
    if let Some(module) = get(ENV_MODULE) {
        config.module = module;
    }
    if let Some(package) = get(ENV_PACKAGE) {
        config.package = Some(package);
    }
}

/// Anchor relative file paths at the workspace folder.
///
/// A bare interpreter name (`python3`) is left alone for `PATH` lookup.
fn resolve_relative_paths(config: &mut ToolchainConfig, workspace: &Path) {
    if let Some(path) = &config.toolchain_path
        && path.is_relative()
    {
        config.toolchain_path = Some(workspace.join(path));
    }
    if config.interpreter.is_relative() && config.interpreter.components().count() > 1 {
        config.interpreter = workspace.join(&config.interpreter);
    }
}
