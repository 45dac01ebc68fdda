//! `buildrun config` subcommands.

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration for the workspace
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a key in the workspace buildrun.toml
    Set {
        /// One of: interpreter, toolchain-path, module, package, extra-args
        key: String,
        /// New value (extra-args is split on whitespace)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Remove a key from the workspace buildrun.toml
    Unset {
        /// One of: interpreter, toolchain-path, module, package, extra-args
        key: String,
    },
}
