//! Application services built on top of the ports.

mod toolchain_service;

pub use toolchain_service::{ToolchainDeps, ToolchainService};
