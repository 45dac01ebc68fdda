//! Top-level subcommands.

use clap::Subcommand;

use crate::config_commands::ConfigCommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a target with the toolchain
    Build {
        /// Target identifier understood by the toolchain
        target: String,
    },
    /// Run (deploy) a target with the toolchain
    Run {
        /// Target identifier understood by the toolchain
        target: String,
    },
    /// Install the toolchain module if it is missing
    Install,
    /// Show the workspace, effective configuration and module state
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// View or change the workspace configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}
