//! Harness-wide constants and default paths.

use std::path::PathBuf;

use crate::error::{HarnessError, Result};

/// Name of the hidden fixture directory created under the user's home.
///
/// Fixtures live under the home directory rather than the system temp dir
/// so that a container runtime backed by a VM (macOS, Windows) can still
/// see them through its default home-directory share.
pub const FIXTURE_DIR_NAME: &str = ".buildrig-integ-tmp";

/// Prefix of temp files materialized from inline build-file content.
pub const TEMP_FILE_PREFIX: &str = "buildrig_integration_test_";

/// Minimum length of an image identifier accepted as a valid digest.
pub const MIN_DIGEST_LEN: usize = 12;

/// Executable name of the build tool under test.
pub const DEFAULT_BUILD_TOOL: &str = "rocker";

/// Executable name of the container runtime CLI.
pub const DEFAULT_RUNTIME: &str = "docker";

/// Environment variable overriding the verbosity level.
pub const ENV_VERBOSITY: &str = "BUILDRIG_VERBOSITY";

/// Environment variable pointing at the build tool executable.
pub const ENV_BUILD_TOOL: &str = "BUILDRIG_BUILD_TOOL";

/// Environment variable pointing at the container runtime executable.
pub const ENV_RUNTIME: &str = "BUILDRIG_RUNTIME";

/// Application name used in CLI output.
pub const APP_NAME: &str = "buildrig";

/// Returns the invoking user's home directory, if it can be determined.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Returns the default fixture base directory (`<home>/.buildrig-integ-tmp`).
///
/// # Errors
///
/// Returns `HarnessError::Configuration` if no home directory is set.
pub fn default_fixture_base() -> Result<PathBuf> {
    home_dir()
        .map(|home| home.join(FIXTURE_DIR_NAME))
        .ok_or_else(|| HarnessError::Configuration {
            message: "cannot locate home directory (HOME/USERPROFILE unset)".into(),
        })
}
