//! Toolchain module installation.
//!
//! The toolchain ships as a Python package. [`PipModuleInstaller`] asks the
//! configured interpreter whether the module can be imported and installs it
//! with `pip` when it cannot.

mod pip;

pub use pip::{PipModuleInstaller, resolve_interpreter};
