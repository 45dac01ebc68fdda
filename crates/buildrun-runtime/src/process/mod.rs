//! Process execution backed by `tokio::process`.
//!
//! - `TokioProcessLauncher` - spawns the child and owns its lifecycle
//! - `stream` - byte-based line readers feeding the shared output channel

mod launcher;
mod stream;

pub use launcher::TokioProcessLauncher;
pub(crate) use stream::spawn_line_reader;
