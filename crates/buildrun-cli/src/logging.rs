//! Logging setup using `tracing`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter: warnings only, and no echo of toolchain output (it is
/// already printed by the progress display).
const DEFAULT_FILTER: &str = "warn,buildrun::toolchain=off";

/// Install the global subscriber, writing to stderr.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` wins over the default.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
