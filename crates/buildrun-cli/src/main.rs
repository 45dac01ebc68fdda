//! CLI entry point - the composition root.
//!
//! Adapters are wired together once in `bootstrap`; every command then goes
//! through a handler that talks to `ToolchainService`.

use std::process::ExitCode;

use buildrun_cli::{
    Cli, CliConfig, CliContext, CliError, Commands, bootstrap, cancel_on_ctrl_c, handlers,
    logging,
};
use buildrun_core::Mode;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables before clap reads BUILDRUN_WORKSPACE
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let ctx = bootstrap(&CliConfig::from_cli(&cli));

    match dispatch(&ctx, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(CliError::Cancelled) => {
            // An install prompt may still be blocked reading stdin on a
            // blocking thread, which would hold up runtime shutdown.
            std::process::exit(i32::from(CliError::Cancelled.exit_code()))
        }
        Err(err) => {
            eprintln!("Error: {err}");
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}

async fn dispatch(ctx: &CliContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Build { target } => {
            handlers::toolchain::execute(ctx, Mode::Build, &target, cancel_on_ctrl_c()).await
        }
        Commands::Run { target } => {
            handlers::toolchain::execute(ctx, Mode::Run, &target, cancel_on_ctrl_c()).await
        }
        Commands::Install => handlers::install::execute(ctx, cancel_on_ctrl_c()).await,
        Commands::Status { json } => handlers::status::execute(ctx, json).await,
        Commands::Config { command } => handlers::config::execute(ctx, command).await,
    }
}
