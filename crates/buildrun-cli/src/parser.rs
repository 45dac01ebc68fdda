//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Drive an external, Python-hosted build toolchain.
#[derive(Parser, Debug)]
#[command(name = "buildrun")]
#[command(about = "Build and run targets with a Python-hosted toolchain")]
#[command(version)]
pub struct Cli {
    /// Workspace folder (default: nearest ancestor containing buildrun.toml)
    #[arg(long, short = 'w', global = true, env = "BUILDRUN_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Install the toolchain module without asking
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_commands::ConfigCommand;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["buildrun", "build", "esp32", "--yes", "-v", "-w", "/tmp/ws"]);
        assert!(cli.yes);
        assert!(cli.verbose);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/ws")));
        match cli.command {
            Commands::Build { target } => assert_eq!(target, "esp32"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_run_requires_target() {
        assert!(Cli::try_parse_from(["buildrun", "run"]).is_err());
    }

    #[test]
    fn test_config_set_parses_key_and_value() {
        let cli = Cli::parse_from(["buildrun", "config", "set", "extra-args", "--jobs 4"]);
        match cli.command {
            Commands::Config {
                command: ConfigCommand::Set { key, value },
            } => {
                assert_eq!(key, "extra-args");
                assert_eq!(value, "--jobs 4");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
