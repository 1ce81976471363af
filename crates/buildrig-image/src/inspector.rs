//! Image digest lookup and removal.

use std::path::{Path, PathBuf};

use buildrig_common::error::{HarnessError, Result};
use buildrig_common::types::ImageDigest;
use buildrig_exec::{CommandSpec, ProcessRunner};

/// Queries the container runtime about built images.
#[derive(Debug, Clone)]
pub struct ImageInspector {
    runtime: PathBuf,
    runner: ProcessRunner,
}

impl ImageInspector {
    /// Creates an inspector for an already resolved runtime executable.
    #[must_use]
    pub fn new(runtime: impl Into<PathBuf>, runner: ProcessRunner) -> Self {
        Self {
            runtime: runtime.into(),
            runner,
        }
    }

    /// Returns the runtime executable path.
    #[must_use]
    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    /// Returns the identifier of `image` as listed by `images -q`.
    ///
    /// # Errors
    ///
    /// - Any process runner error for the listing command.
    /// - `HarnessError::OutputValidation` if the trimmed output is shorter
    ///   than 12 characters (including when the image does not exist).
    pub fn digest_of(&self, image: &str) -> Result<ImageDigest> {
        let command = CommandSpec::new(&self.runtime).args(["images", "-q", image]);
        let output = self.runner.capture(&command)?;
        let raw = String::from_utf8_lossy(&output);

        let digest = ImageDigest::parse(&raw).map_err(|message| HarnessError::OutputValidation {
            command: command.render(),
            message,
        })?;
        tracing::debug!(image, digest = %digest, "resolved image digest");
        Ok(digest)
    }

    /// Removes `image` with `rmi`.
    ///
    /// # Errors
    ///
    /// Any process runner error; a non-zero exit is `HarnessError::Execution`.
    pub fn remove(&self, image: &str) -> Result<()> {
        let command = CommandSpec::new(&self.runtime).args(["rmi", image]);
        let _ = self.runner.run(&command, None)?;
        tracing::info!(image, "image removed");
        Ok(())
    }
}
