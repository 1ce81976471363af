//! Scoped ownership of a temporary file or directory.

use std::path::{Path, PathBuf};

use buildrig_common::error::{HarnessError, Result};
use buildrig_common::types::TempResourceKind;
use tempfile::{TempDir, TempPath};

#[derive(Debug)]
enum Guard {
    Dir(TempDir),
    File(TempPath),
}

/// A temporary file or directory owned by one caller.
///
/// The path is removed when the resource is dropped, on every exit path.
/// Use [`TempResource::close`] to observe removal errors, or
/// [`TempResource::keep`] to leave the path on disk for inspection.
#[derive(Debug)]
pub struct TempResource {
    path: PathBuf,
    guard: Guard,
}

impl TempResource {
    pub(crate) fn dir(dir: TempDir) -> Self {
        Self {
            path: dir.path().to_path_buf(),
            guard: Guard::Dir(dir),
        }
    }

    pub(crate) fn file(path: TempPath) -> Self {
        Self {
            path: path.to_path_buf(),
            guard: Guard::File(path),
        }
    }

    /// Returns the resource's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether this is a file or a directory.
    #[must_use]
    pub const fn kind(&self) -> TempResourceKind {
        match self.guard {
            Guard::Dir(_) => TempResourceKind::Directory,
            Guard::File(_) => TempResourceKind::File,
        }
    }

    /// Removes the resource now, reporting any failure.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Filesystem` if removal fails.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        let result = match self.guard {
            Guard::Dir(dir) => dir.close(),
            Guard::File(file) => file.close(),
        };
        result.map_err(|source| HarnessError::Filesystem {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "temp resource removed");
        Ok(())
    }

    /// Disarms cleanup and returns the path, which stays on disk.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Filesystem` if a temp file cannot be persisted.
    pub fn keep(self) -> Result<PathBuf> {
        let path = match self.guard {
            Guard::Dir(dir) => dir.keep(),
            Guard::File(file) => file.keep().map_err(|e| HarnessError::Filesystem {
                path: self.path.clone(),
                source: e.error,
            })?,
        };
        tracing::info!(path = %path.display(), "keeping temp resource");
        Ok(path)
    }

    /// Removes the resource, logging instead of returning a failure.
    ///
    /// Used on error paths where a cleanup failure must not mask the
    /// original error.
    pub fn discard(self) {
        let path = self.path.clone();
        if let Err(e) = self.close() {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove temp resource");
        }
    }
}
