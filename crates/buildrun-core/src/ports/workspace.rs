//! Workspace folder selection port.

use std::path::PathBuf;

/// Port that answers "which folder are we working in?".
///
/// Returning `None` means no folder is selected; callers abort quietly.
pub trait WorkspacePort: Send + Sync {
    fn current_folder(&self) -> Option<PathBuf>;
}
