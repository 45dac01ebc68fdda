//! `buildrun config show|set|unset`.

use buildrun_core::{AbortReason, ConfigKey, ConfigUpdate, CoreError, ToolchainConfig};

use super::abort_notice;
use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<(), CliError> {
    match command {
        ConfigCommand::Show { json } => show(ctx, json).await,
        ConfigCommand::Set { key, value } => {
            let key = parse_key(&key)?;
            let update = ConfigUpdate::set(key, &value).map_err(CoreError::from)?;
            apply(ctx, &update, &format!("{key} set")).await
        }
        ConfigCommand::Unset { key } => {
            let key = parse_key(&key)?;
            apply(ctx, &ConfigUpdate::unset(key), &format!("{key} reset to default")).await
        }
    }
}

async fn show(ctx: &CliContext, json: bool) -> Result<(), CliError> {
    let Some((workspace, config)) = ctx.service().config().await? else {
        eprintln!("{}", abort_notice(AbortReason::NoWorkspace));
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("# effective configuration for {}", workspace.display());
        for (key, value) in entries(&config) {
            println!("{key} = {value}");
        }
    }
    Ok(())
}

async fn apply(ctx: &CliContext, update: &ConfigUpdate, done: &str) -> Result<(), CliError> {
    match ctx.service().update_config(update).await? {
        Some(_) => println!("✓ {done}."),
        None => eprintln!("{}", abort_notice(AbortReason::NoWorkspace)),
    }
    Ok(())
}

fn parse_key(raw: &str) -> Result<ConfigKey, CliError> {
    raw.parse::<ConfigKey>()
        .map_err(|e| CliError::Arguments(e.to_string()))
}

/// `(key, value)` pairs in `ConfigKey::ALL` order. Unset values print as `-`.
fn entries(config: &ToolchainConfig) -> Vec<(ConfigKey, String)> {
    ConfigKey::ALL
        .into_iter()
        .map(|key| {
            let value = match key {
                ConfigKey::Interpreter => config.interpreter.display().to_string(),
                ConfigKey::ToolchainPath => config
                    .toolchain_path
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
                ConfigKey::Module => config.module.clone(),
                ConfigKey::Package => config
                    .package
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                ConfigKey::ExtraArgs if config.extra_args.is_empty() => "-".to_string(),
                ConfigKey::ExtraArgs => config.extra_args.join(" "),
            };
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_entries_cover_every_key() {
        let config = ToolchainConfig {
            toolchain_path: Some(PathBuf::from("/tc/main.py")),
            extra_args: vec!["--color".to_string()],
            ..ToolchainConfig::default()
        };
        let entries = entries(&config);
        assert_eq!(entries.len(), ConfigKey::ALL.len());
        assert_eq!(entries[1], (ConfigKey::ToolchainPath, "/tc/main.py".to_string()));
        assert_eq!(entries[3], (ConfigKey::Package, "-".to_string()));
        assert_eq!(entries[4], (ConfigKey::ExtraArgs, "--color".to_string()));
    }

    #[test]
    fn test_unknown_key_is_argument_error() {
        let err = parse_key("colour").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
