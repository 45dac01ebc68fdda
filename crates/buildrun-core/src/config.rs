//! Toolchain configuration types and validation.
//!
//! These are pure domain types: reading and writing them is the job of a
//! [`ConfigPort`](crate::ports::ConfigPort) adapter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{CommandSpec, Mode, Target};
use crate::ports::{ConfigError, CoreError};

/// Default interpreter used when none is configured.
#[cfg(target_os = "windows")]
pub const DEFAULT_INTERPRETER: &str = "python";

/// Default interpreter used when none is configured.
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Python import name of the toolchain module when none is configured.
pub const DEFAULT_TOOLCHAIN_MODULE: &str = "buildrun_toolchain";

/// Effective configuration for one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Interpreter that hosts the toolchain.
    pub interpreter: PathBuf,
    /// Toolchain entry script. When set it replaces `-m <module>`.
    pub toolchain_path: Option<PathBuf>,
    /// Python import name of the toolchain module.
    pub module: String,
    /// pip requirement used to install the module (defaults to `module`).
    pub package: Option<String>,
    /// Extra toolchain arguments placed before the mode word.
    pub extra_args: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            toolchain_path: None,
            module: DEFAULT_TOOLCHAIN_MODULE.to_string(),
            package: None,
            extra_args: Vec::new(),
        }
    }
}

impl ToolchainConfig {
    /// The pip requirement to install when the module is missing.
    pub fn requirement(&self) -> &str {
        self.package.as_deref().unwrap_or(&self.module)
    }

    /// Arguments that select the toolchain on the interpreter's command line.
    pub fn toolchain_args(&self) -> Vec<String> {
        match &self.toolchain_path {
            Some(path) => vec![path.display().to_string()],
            None => vec!["-m".to_string(), self.module.clone()],
        }
    }

    /// Build `<interpreter> <toolchain-args...> <extra-args...> {build|run} <target>`.
    pub fn command_for(&self, mode: Mode, target: &Target, working_dir: &Path) -> CommandSpec {
        CommandSpec::new(&self.interpreter, working_dir)
            .args(self.toolchain_args())
            .args(self.extra_args.iter().cloned())
            .arg(mode.as_subcommand())
            .arg(target.as_str())
            .env("PYTHONUNBUFFERED", "1")
    }

    /// Apply a partial update, only touching fields that are `Some`.
    pub fn merge(&mut self, update: &ConfigUpdate) {
        if let Some(ref interpreter) = update.interpreter {
            self.interpreter = interpreter
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INTERPRETER));
        }
        if let Some(ref path) = update.toolchain_path {
            self.toolchain_path.clone_from(path);
        }
        if let Some(ref module) = update.module {
            self.module = module
                .clone()
                .unwrap_or_else(|| DEFAULT_TOOLCHAIN_MODULE.to_string());
        }
        if let Some(ref package) = update.package {
            self.package.clone_from(package);
        }
        if let Some(ref args) = update.extra_args {
            self.extra_args.clone_from(args);
        }
    }

    /// Check the configuration is usable before spawning anything.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interpreter.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("interpreter path cannot be empty".to_string()).into());
        }
        if let Some(path) = &self.toolchain_path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid("toolchain path cannot be empty".to_string()).into());
        }
        validate_module_name(&self.module)?;
        if let Some(package) = &self.package
            && package.trim().is_empty()
        {
            return Err(ConfigError::Invalid("package cannot be empty".to_string()).into());
        }
        Ok(())
    }
}

/// Validate a Python import name (`pkg.sub_module`).
pub fn validate_module_name(module: &str) -> Result<(), ConfigError> {
    let valid = !module.is_empty()
        && !module.starts_with('.')
        && !module.ends_with('.')
        && !module.contains("..")
        && module
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "'{module}' is not a valid Python module name"
        )))
    }
}

/// Partial configuration update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset the field to its default
/// - `Some(Some(value))` = set the field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub interpreter: Option<Option<PathBuf>>,
    pub toolchain_path: Option<Option<PathBuf>>,
    pub module: Option<Option<String>>,
    pub package: Option<Option<String>>,
    pub extra_args: Option<Vec<String>>,
}

impl ConfigUpdate {
    /// Update that sets one key from its textual form.
    pub fn set(key: ConfigKey, value: &str) -> Result<Self, ConfigError> {
        let mut update = Self::default();
        if key != ConfigKey::ExtraArgs && value.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{key} cannot be empty; use unset to restore the default"
            )));
        }
        match key {
            ConfigKey::Interpreter => update.interpreter = Some(Some(PathBuf::from(value))),
            ConfigKey::ToolchainPath => update.toolchain_path = Some(Some(PathBuf::from(value))),
            ConfigKey::Module => {
                validate_module_name(value)?;
                update.module = Some(Some(value.to_string()));
            }
            ConfigKey::Package => update.package = Some(Some(value.to_string())),
            ConfigKey::ExtraArgs => {
                update.extra_args = Some(value.split_whitespace().map(String::from).collect());
            }
        }
        Ok(update)
    }

    /// Update that resets one key to its default.
    pub fn unset(key: ConfigKey) -> Self {
        let mut update = Self::default();
        match key {
            ConfigKey::Interpreter => update.interpreter = Some(None),
            ConfigKey::ToolchainPath => update.toolchain_path = Some(None),
            ConfigKey::Module => update.module = Some(None),
            ConfigKey::Package => update.package = Some(None),
            ConfigKey::ExtraArgs => update.extra_args = Some(Vec::new()),
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Keys accepted by `buildrun config set/unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Interpreter,
    ToolchainPath,
    Module,
    Package,
    ExtraArgs,
}

impl ConfigKey {
    pub const ALL: [Self; 5] = [
        Self::Interpreter,
        Self::ToolchainPath,
        Self::Module,
        Self::Package,
        Self::ExtraArgs,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interpreter => "interpreter",
            Self::ToolchainPath => "toolchain-path",
            Self::Module => "module",
            Self::Package => "package",
            Self::ExtraArgs => "extra-args",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
                ConfigError::Invalid(format!(
                    "unknown config key '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str) -> Target {
        Target::new(name).unwrap()
    }

    #[test]
    fn test_default_uses_module_invocation() {
        let config = ToolchainConfig::default();
        assert_eq!(
            config.toolchain_args(),
            vec!["-m".to_string(), DEFAULT_TOOLCHAIN_MODULE.to_string()]
        );
        assert_eq!(config.requirement(), DEFAULT_TOOLCHAIN_MODULE);
    }

    #[test]
    fn test_command_for_with_toolchain_path() {
        let config = ToolchainConfig {
            interpreter: PathBuf::from("/opt/py/bin/python"),
            toolchain_path: Some(PathBuf::from("/opt/toolchain/main.py")),
            extra_args: vec!["--verbose".to_string()],
            ..ToolchainConfig::default()
        };

        let spec = config.command_for(Mode::Run, &target("board-a"), Path::new("/work"));

        assert_eq!(spec.program, PathBuf::from("/opt/py/bin/python"));
        assert_eq!(
            spec.args,
            vec!["/opt/toolchain/main.py", "--verbose", "run", "board-a"]
        );
        assert_eq!(spec.working_dir, PathBuf::from("/work"));
        assert!(spec.env.contains(&("PYTHONUNBUFFERED".to_string(), "1".to_string())));
    }

    #[test]
    fn test_command_for_module_build() {
        let config = ToolchainConfig::default();
        let spec = config.command_for(Mode::Build, &target("app"), Path::new("/w"));
        assert_eq!(spec.args, vec!["-m", DEFAULT_TOOLCHAIN_MODULE, "build", "app"]);
    }

    #[test]
    fn test_merge_resets_to_defaults() {
        let mut config = ToolchainConfig {
            interpreter: PathBuf::from("/usr/bin/python3.12"),
            module: "custom".to_string(),
            package: Some("custom-pkg==1.0".to_string()),
            ..ToolchainConfig::default()
        };

        config.merge(&ConfigUpdate::unset(ConfigKey::Interpreter));
        config.merge(&ConfigUpdate::unset(ConfigKey::Module));
        config.merge(&ConfigUpdate::unset(ConfigKey::Package));

        assert_eq!(config, ToolchainConfig::default());
    }

    #[test]
    fn test_set_extra_args_splits_whitespace() {
        let update = ConfigUpdate::set(ConfigKey::ExtraArgs, "--jobs 4  --color").unwrap();
        assert_eq!(
            update.extra_args,
            Some(vec!["--jobs".to_string(), "4".to_string(), "--color".to_string()])
        );
    }

    #[test]
    fn test_set_rejects_empty_values() {
        for key in [
            ConfigKey::Interpreter,
            ConfigKey::ToolchainPath,
            ConfigKey::Module,
            ConfigKey::Package,
        ] {
            assert!(
                matches!(ConfigUpdate::set(key, "  "), Err(ConfigError::Invalid(_))),
                "{key} accepted a blank value"
            );
        }
        let cleared = ConfigUpdate::set(ConfigKey::ExtraArgs, "").unwrap();
        assert_eq!(cleared.extra_args, Some(Vec::new()));
    }

    #[test]
    fn test_module_name_validation() {
        assert!(validate_module_name("buildrun_toolchain").is_ok());
        assert!(validate_module_name("pkg.sub").is_ok());
        assert!(validate_module_name("").is_err());
        assert!(validate_module_name("bad name").is_err());
        assert!(validate_module_name("pkg..sub").is_err());
        assert!(validate_module_name("os;rm").is_err());
        assert!(ConfigUpdate::set(ConfigKey::Module, "no spaces").is_err());
    }

    #[test]
    fn test_config_key_parsing() {
        assert_eq!("toolchain_path".parse::<ConfigKey>().unwrap(), ConfigKey::ToolchainPath);
        assert_eq!("Interpreter".parse::<ConfigKey>().unwrap(), ConfigKey::Interpreter);
        let err = "colour".parse::<ConfigKey>().unwrap_err();
        assert!(err.to_string().contains("extra-args"));
    }

    #[test]
    fn test_validate_rejects_empty_interpreter() {
        let config = ToolchainConfig {
            interpreter: PathBuf::new(),
            ..ToolchainConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ToolchainConfig::default().validate().is_ok());
    }
}
