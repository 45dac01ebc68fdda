//! `buildrun status`.

use std::fmt::Write as _;
use std::path::Path;

use buildrun_core::{AbortReason, ToolchainStatus};
use buildrun_runtime::resolve_interpreter;

use super::abort_notice;
use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, json: bool) -> Result<(), CliError> {
    let Some(status) = ctx.service().status().await? else {
        eprintln!("{}", abort_notice(AbortReason::NoWorkspace));
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let resolved = resolve_interpreter(&status.config.interpreter);
    print!(
        "{}",
        render(&status, resolved.as_deref(), ctx.user_config.as_deref())
    );
    Ok(())
}

/// Human-readable status report.
fn render(status: &ToolchainStatus, resolved: Option<&Path>, user_config: Option<&Path>) -> String {
    let config = &status.config;
    let mut out = String::new();

    let _ = writeln!(out, "Workspace:    {}", status.workspace.display());
    if let Some(path) = user_config {
        let _ = writeln!(out, "User config:  {}", path.display());
    }

    let interpreter = match resolved {
        Some(path) if path != config.interpreter.as_path() => {
            format!("{} ({})", config.interpreter.display(), path.display())
        }
        Some(_) => config.interpreter.display().to_string(),
        None => format!("{} (not found)", config.interpreter.display()),
    };
    let _ = writeln!(out, "Interpreter:  {interpreter}");

    match &config.toolchain_path {
        Some(path) => {
            let _ = writeln!(out, "Toolchain:    {}", path.display());
        }
        None => {
            let _ = writeln!(out, "Toolchain:    -m {}", config.module);
        }
    }
    let _ = writeln!(
        out,
        "Module:       {} ({})",
        config.module,
        if status.module_installed {
            "installed"
        } else {
            "not installed"
        }
    );
    let _ = writeln!(out, "Package:      {}", config.requirement());
    if !config.extra_args.is_empty() {
        let _ = writeln!(out, "Extra args:   {}", config.extra_args.join(" "));
    }
    out
}
