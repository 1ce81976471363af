//! The harness facade.

use std::sync::OnceLock;

use buildrig_build::BuildInvoker;
use buildrig_common::config::{HarnessConfig, ToolLocation};
use buildrig_common::error::Result;
use buildrig_common::types::VerbosityLevel;
use buildrig_exec::{Console, ProcessRunner};
use buildrig_fixture::TempWorkspace;
use buildrig_image::ImageInspector;

/// Everything a build scenario needs, sharing one verbosity and console.
///
/// Each tool location is resolved the first time its component is
/// requested, so a harness that only inspects images never needs the
/// build tool installed.
#[derive(Debug, Clone)]
pub struct Harness {
    runner: ProcessRunner,
    workspace: TempWorkspace,
    build_location: ToolLocation,
    runtime_location: ToolLocation,
    build_tool: OnceLock<BuildInvoker>,
    images: OnceLock<ImageInspector>,
}

impl Harness {
    /// Builds a harness writing to real stdio.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Configuration` if the fixture base cannot be
    /// determined.
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        Self::with_console(config, Console::stdio())
    }

    /// Builds a harness writing to `console`.
    ///
    /// # Errors
    ///
    /// Same as [`Harness::from_config`].
    pub fn with_console(config: &HarnessConfig, console: Console) -> Result<Self> {
        let runner = ProcessRunner::new(config.verbosity, console.clone());
        let workspace = TempWorkspace::from_config(config, console)?;

        tracing::info!(
            fixture_base = %workspace.base().display(),
            verbosity = %config.verbosity,
            "harness ready"
        );

        Ok(Self {
            runner,
            workspace,
            build_location: config.build_tool.clone(),
            runtime_location: config.runtime.clone(),
            build_tool: OnceLock::new(),
            images: OnceLock::new(),
        })
    }

    /// The build tool under test.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Configuration` if the build tool cannot be located.
    pub fn build_tool(&self) -> Result<&BuildInvoker> {
        if let Some(invoker) = self.build_tool.get() {
            return Ok(invoker);
        }
        let program = self.build_location.resolve()?;
        tracing::debug!(build_tool = %program.display(), "build tool resolved");
        let invoker = BuildInvoker::new(program, self.runner.clone(), self.workspace.clone());
        Ok(self.build_tool.get_or_init(|| invoker))
    }

    /// The container runtime's image queries.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Configuration` if the runtime cannot be located.
    pub fn images(&self) -> Result<&ImageInspector> {
        if let Some(inspector) = self.images.get() {
            return Ok(inspector);
        }
        let runtime = self.runtime_location.resolve()?;
        tracing::debug!(runtime = %runtime.display(), "container runtime resolved");
        let inspector = ImageInspector::new(runtime, self.runner.clone());
        Ok(self.images.get_or_init(|| inspector))
    }

    /// Fixture and scratch-file allocation.
    #[must_use]
    pub const fn workspace(&self) -> &TempWorkspace {
        &self.workspace
    }

    /// The shared process runner.
    #[must_use]
    pub const fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    /// The verbosity every component was built with.
    #[must_use]
    pub const fn verbosity(&self) -> VerbosityLevel {
        self.runner.verbosity()
    }

    /// Prints a diagnostic line at the highest verbosity.
    pub fn debug(&self, message: &str) {
        self.runner.debug(message);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use buildrig_common::error::HarnessError;

    use super::*;

    fn unset_env_dir() -> ToolLocation {
        ToolLocation::EnvDir {
            var: "BUILDRIG_TEST_UNSET_DIR_4F1A".into(),
            relative: "bin/rocker".into(),
        }
    }

    #[test]
    fn unresolvable_build_tool_fails_on_use() {
        let config = HarnessConfig {
            build_tool: unset_env_dir(),
            runtime: ToolLocation::Fixed("/usr/bin/docker".into()),
            fixture_base: Some("/tmp/buildrig-fixtures".into()),
            ..HarnessConfig::default()
        };
        let harness = Harness::with_console(&config, Console::captured()).expect("harness");
        let err = harness.build_tool().unwrap_err();
        assert!(matches!(err, HarnessError::Configuration { .. }));
    }

    #[test]
    fn image_queries_do_not_need_the_build_tool() {
        let config = HarnessConfig {
            build_tool: unset_env_dir(),
            runtime: ToolLocation::Fixed("/opt/docker".into()),
            fixture_base: Some("/tmp/buildrig-fixtures".into()),
            ..HarnessConfig::default()
        };
        let harness = Harness::with_console(&config, Console::captured()).expect("harness");
        assert_eq!(harness.images().unwrap().runtime(), Path::new("/opt/docker"));
        assert!(harness.build_tool().is_err());
    }

    #[test]
    fn components_share_verbosity() {
        let config = HarnessConfig {
            verbosity: VerbosityLevel::Commands,
            build_tool: ToolLocation::Fixed("/opt/rocker".into()),
            runtime: ToolLocation::Fixed("/opt/docker".into()),
            fixture_base: Some("/tmp/buildrig-fixtures".into()),
            scratch_dir: Some("/tmp/buildrig-scratch".into()),
        };
        let harness = Harness::with_console(&config, Console::captured()).expect("harness");
        assert_eq!(harness.verbosity(), VerbosityLevel::Commands);
        assert_eq!(harness.build_tool().unwrap().program(), Path::new("/opt/rocker"));
        assert!(std::ptr::eq(harness.build_tool().unwrap(), harness.build_tool().unwrap()));
        assert_eq!(harness.images().unwrap().runtime(), Path::new("/opt/docker"));
        assert_eq!(harness.workspace().scratch(), Path::new("/tmp/buildrig-scratch"));
    }
}
