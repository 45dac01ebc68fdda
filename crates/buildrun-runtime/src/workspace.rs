//! Workspace folder selection.

use std::path::{Path, PathBuf};

use buildrun_core::WorkspacePort;
use tracing::{debug, warn};

use crate::config_store::WORKSPACE_CONFIG_FILE;

/// [`WorkspacePort`] adapter resolved once at startup.
///
/// An explicit folder wins if it is an existing directory. Otherwise the
/// nearest ancestor of the start directory holding `buildrun.toml` is used.
#[derive(Debug, Clone)]
pub struct WorkspaceLocator {
    folder: Option<PathBuf>,
}

impl WorkspaceLocator {
    /// Locate the workspace from `explicit` or the current directory.
    pub fn new(explicit: Option<PathBuf>) -> Self {
        match explicit {
            Some(dir) => Self::explicit(&dir),
            None => match std::env::current_dir() {
                Ok(cwd) => Self::from_dir(&cwd),
                Err(e) => {
                    warn!(error = %e, "cannot read current directory");
                    Self { folder: None }
                }
            },
        }
    }

    /// Search upward from `start` for a folder containing `buildrun.toml`.
    pub fn from_dir(start: &Path) -> Self {
        let folder = start
            .ancestors()
            .find(|dir| dir.join(WORKSPACE_CONFIG_FILE).is_file())
            .map(Path::to_path_buf);
        match &folder {
            Some(dir) => debug!(workspace = %dir.display(), "found workspace marker"),
            None => debug!(start = %start.display(), "no {WORKSPACE_CONFIG_FILE} found above start"),
        }
        Self { folder }
    }

    fn explicit(dir: &Path) -> Self {
        if !dir.is_dir() {
            warn!(path = %dir.display(), "workspace folder does not exist");
            return Self { folder: None };
        }
        let folder = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        Self {
            folder: Some(folder),
        }
    }
}

impl WorkspacePort for WorkspaceLocator {
    fn current_folder(&self) -> Option<PathBuf> {
        self.folder.clone()
    }
}
