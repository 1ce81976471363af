//! Harness configuration model.
//!
//! Executable locations are injected rather than looked up inside the
//! components: a [`ToolLocation`] is resolved once, and the resulting path
//! is handed to the build invoker and image inspector at construction.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{HarnessError, Result};
use crate::types::VerbosityLevel;

/// Strategy for locating an external executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolLocation {
    /// An explicit path, used as-is.
    Fixed(PathBuf),
    /// A path relative to the directory named by an environment variable.
    EnvDir {
        /// Environment variable holding the base directory.
        var: String,
        /// Path of the executable relative to that directory.
        relative: PathBuf,
    },
    /// An executable name searched for on `PATH`.
    Discover(String),
}

impl ToolLocation {
    /// The `$GOPATH/bin/<name>` convention used by Go toolchains.
    #[must_use]
    pub fn gopath_bin(name: &str) -> Self {
        Self::EnvDir {
            var: "GOPATH".into(),
            relative: Path::new("bin").join(name),
        }
    }

    /// Resolves the location to a concrete executable path.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Configuration` if the environment variable is
    /// unset or the executable is not on `PATH`.
    pub fn resolve(&self) -> Result<PathBuf> {
        self.resolve_with(|var| std::env::var_os(var).map(PathBuf::from))
    }

    fn resolve_with(&self, lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<PathBuf> {
        let path = match self {
            Self::Fixed(path) => path.clone(),
            Self::EnvDir { var, relative } => {
                let base = lookup(var)
                    .filter(|p| !p.as_os_str().is_empty())
                    .ok_or_else(|| HarnessError::Configuration {
                        message: format!("${var} is not defined"),
                    })?;
                base.join(relative)
            }
            Self::Discover(name) => {
                which::which(name).map_err(|e| HarnessError::Configuration {
                    message: format!("`{name}` not found on PATH: {e}"),
                })?
            }
        };
        tracing::debug!(location = ?self, path = %path.display(), "resolved tool location");
        Ok(path)
    }
}

/// Root configuration for a harness instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Console verbosity (0, 1, or 2).
    pub verbosity: VerbosityLevel,
    /// Location of the build tool under test.
    pub build_tool: ToolLocation,
    /// Location of the container runtime CLI.
    pub runtime: ToolLocation,
    /// Base directory for fixtures; defaults to `<home>/.buildrig-integ-tmp`.
    pub fixture_base: Option<PathBuf>,
    /// Directory for materialized build files; defaults to the OS temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            verbosity: VerbosityLevel::default(),
            build_tool: ToolLocation::Discover(constants::DEFAULT_BUILD_TOOL.into()),
            runtime: ToolLocation::Discover(constants::DEFAULT_RUNTIME.into()),
            fixture_base: None,
            scratch_dir: None,
        }
    }
}

impl HarnessConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::Filesystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), "loaded harness configuration");
        Ok(config)
    }

    /// Builds the default configuration overlaid with `BUILDRIG_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `BUILDRIG_VERBOSITY` is not 0, 1, or 2.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|var| std::env::var(var).ok())
    }

    /// Applies `BUILDRIG_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the verbosity override is invalid.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(level) = lookup(constants::ENV_VERBOSITY).filter(|v| !v.is_empty()) {
            self.verbosity = level.parse()?;
        }
        if let Some(path) = lookup(constants::ENV_BUILD_TOOL).filter(|p| !p.is_empty()) {
            self.build_tool = ToolLocation::Fixed(path.into());
        }
        if let Some(path) = lookup(constants::ENV_RUNTIME).filter(|p| !p.is_empty()) {
            self.runtime = ToolLocation::Fixed(path.into());
        }
        Ok(self)
    }

    /// Returns the fixture base directory, falling back to the home default.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory is unknown.
    pub fn fixture_base(&self) -> Result<PathBuf> {
        self.fixture_base
            .clone()
            .map_or_else(constants::default_fixture_base, Ok)
    }

    /// Returns the scratch directory for single temp files.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
