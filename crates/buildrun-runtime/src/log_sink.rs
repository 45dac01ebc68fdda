//! Log sink that forwards toolchain output to `tracing`.

use buildrun_core::{LogLevel, LogSinkPort};
use tracing::{error, info};

/// Records toolchain output as `tracing` events under `buildrun::toolchain`.
///
/// Filter with `RUST_LOG=buildrun::toolchain=info` to see raw output in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSinkPort for TracingLogSink {
    fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => info!(target: "buildrun::toolchain", "{message}"),
            LogLevel::Error => error!(target: "buildrun::toolchain", "{message}"),
        }
    }
}
