//! Description of a single build run.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Where the build file comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BuildSource {
    /// Inline content, materialized as a temp file for the duration of the run.
    Content(String),
    /// An existing build file.
    File(PathBuf),
    /// No `-f` flag: the tool picks up the build file from its working directory.
    #[default]
    Context,
}

/// Everything needed for one build run.
///
/// The general form every `BuildInvoker` convenience method reduces to.
#[derive(Default)]
pub struct BuildRunConfig<'a> {
    /// Build file source.
    pub source: BuildSource,
    /// Options placed before the `build` subcommand.
    pub global_options: Vec<String>,
    /// Options placed after the build file.
    pub build_options: Vec<String>,
    /// Working directory of the tool; `None` inherits the harness's own.
    pub working_dir: Option<PathBuf>,
    /// Receives the tool's stdout.
    pub output: Option<&'a mut dyn Write>,
}

impl<'a> BuildRunConfig<'a> {
    /// Builds from inline build-file content.
    #[must_use]
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            source: BuildSource::Content(content.into()),
            ..Self::default()
        }
    }

    /// Builds from an existing build file.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: BuildSource::File(path.into()),
            ..Self::default()
        }
    }

    /// Builds whatever the tool finds in `dir`, without `-f`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: BuildSource::Context,
            working_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Sets the global options.
    #[must_use]
    pub fn global_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-run options.
    #[must_use]
    pub fn build_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Sets the stdout sink.
    #[must_use]
    pub fn output(mut self, sink: &'a mut dyn Write) -> Self {
        self.output = Some(sink);
        self
    }
}

impl fmt::Debug for BuildRunConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildRunConfig")
            .field("source", &self.source)
            .field("global_options", &self.global_options)
            .field("build_options", &self.build_options)
            .field("working_dir", &self.working_dir)
            .field("output", &self.output.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_has_no_file_and_sets_working_dir() {
        let config = BuildRunConfig::in_dir("/work/ctx").build_options(["--no-cache"]);
        assert_eq!(config.source, BuildSource::Context);
        assert_eq!(config.working_dir, Some(PathBuf::from("/work/ctx")));
        assert_eq!(config.build_options, ["--no-cache"]);
    }

    #[test]
    fn builder_sets_every_field() {
        let mut sink = Vec::new();
        let config = BuildRunConfig::from_content("FROM scratch")
            .global_options(["--no-cache"])
            .build_options(["--var", "A=1"])
            .working_dir("/work")
            .output(&mut sink);
        assert_eq!(config.source, BuildSource::Content("FROM scratch".into()));
        assert_eq!(config.global_options, ["--no-cache"]);
        assert_eq!(config.build_options, ["--var", "A=1"]);
        assert!(config.output.is_some());
        assert!(format!("{config:?}").contains("output: true"));
    }
}
