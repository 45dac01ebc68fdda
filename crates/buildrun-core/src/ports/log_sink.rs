//! Log sink port for toolchain output.
//!
//! This port abstracts the destination for log records produced while a
//! toolchain command runs, allowing different implementations for the CLI
//! (tracing) and tests (in-memory recorders).

use std::fmt;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Port for recording log messages.
///
/// Implementations should be thread-safe and non-blocking where possible.
pub trait LogSinkPort: Send + Sync {
    /// Record one message. `message` carries no trailing newline.
    fn record(&self, level: LogLevel, message: &str);
}

