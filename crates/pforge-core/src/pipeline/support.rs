//! Scoped copy of the model-checker runtime support file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Copies the runtime support file into the output directory.
///
/// Call [`SupportFileGuard::remove`] once the model checker has run. If the
/// guard is dropped without it (early return, unwinding) the copy is still
/// removed, but a failure can only be logged.
#[derive(Debug)]
pub struct SupportFileGuard {
    path: PathBuf,
    armed: bool,
}

impl SupportFileGuard {
    /// Copy `source` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the copy fails; nothing is left to clean up.
    pub fn copy(source: &Path, destination: impl Into<PathBuf>) -> Result<Self> {
        let path = destination.into();
        fs::copy(source, &path).map_err(|e| Error::io(source, e))?;
        tracing::debug!("Copied {} to {}", source.display(), path.display());
        Ok(Self { path, armed: true })
    }

    /// Location of the copied file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the copy cannot be removed.
    pub fn remove(mut self) -> Result<()> {
        self.armed = false;
        fs::remove_file(&self.path).map_err(|e| Error::io(&self.path, e))?;
        tracing::debug!("Removed {}", self.path.display());
        Ok(())
    }
}

impl Drop for SupportFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed {}", self.path.display()),
            Err(e) => tracing::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
