//! Running the build tool.

use std::io::Write;
use std::path::{Path, PathBuf};

use buildrig_common::error::Result;
use buildrig_exec::{CommandOutcome, CommandSpec, ProcessRunner};
use buildrig_fixture::TempWorkspace;

use crate::config::{BuildRunConfig, BuildSource};
use crate::invocation::{BuildInvocation, NO_CACHE_FLAG};

/// Runs the build tool in its `build` and `pull` modes.
///
/// Only composes arguments: errors from the process runner are returned
/// unchanged.
#[derive(Debug, Clone)]
pub struct BuildInvoker {
    program: PathBuf,
    runner: ProcessRunner,
    workspace: TempWorkspace,
}

impl BuildInvoker {
    /// Creates an invoker for an already resolved build-tool executable.
    #[must_use]
    pub fn new(
        program: impl Into<PathBuf>,
        runner: ProcessRunner,
        workspace: TempWorkspace,
    ) -> Self {
        Self {
            program: program.into(),
            runner,
            workspace,
        }
    }

    /// Returns the build-tool executable path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `build` as described by `config`.
    ///
    /// Inline content is written to a temp file that is removed once the
    /// tool exits, whether the build succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns a filesystem error if inline content cannot be materialized,
    /// otherwise whatever the process runner reports.
    pub fn run(&self, config: BuildRunConfig<'_>) -> Result<CommandOutcome> {
        let BuildRunConfig {
            source,
            global_options,
            build_options,
            working_dir,
            output,
        } = config;

        let (file, materialized) = match source {
            BuildSource::Content(content) => {
                let temp = self.workspace.create_temp_file(content)?;
                (Some(temp.path().to_path_buf()), Some(temp))
            }
            BuildSource::File(path) => (Some(path), None),
            BuildSource::Context => (None, None),
        };

        if let Some(dir) = &working_dir {
            self.runner.debug(&format!("CWD: {}", dir.display()));
        }

        let invocation = BuildInvocation {
            global_options,
            file,
            options: build_options,
            ..BuildInvocation::build()
        };
        let result = self.execute(&invocation, working_dir.as_deref(), output);

        if let Some(temp) = materialized {
            temp.discard();
        }
        result
    }

    /// Builds inline content with no extra options.
    ///
    /// # Errors
    ///
    /// See [`BuildInvoker::run`].
    pub fn build(&self, content: &str) -> Result<CommandOutcome> {
        self.run(BuildRunConfig::from_content(content))
    }

    /// Builds inline content with trailing per-run options.
    ///
    /// # Errors
    ///
    /// See [`BuildInvoker::run`].
    pub fn build_with_options(&self, content: &str, options: &[&str]) -> Result<CommandOutcome> {
        self.run(BuildRunConfig::from_content(content).build_options(options.iter().copied()))
    }

    /// Builds an existing file with trailing per-run options.
    ///
    /// # Errors
    ///
    /// See [`BuildInvoker::run`].
    pub fn build_file(&self, path: &Path, options: &[&str]) -> Result<CommandOutcome> {
        self.run(BuildRunConfig::from_file(path).build_options(options.iter().copied()))
    }

    /// Builds an existing file with the cache disabled.
    ///
    /// # Errors
    ///
    /// See [`BuildInvoker::run`].
    pub fn build_file_no_cache(&self, path: &Path) -> Result<CommandOutcome> {
        let invocation = BuildInvocation::build()
            .subcommand_options([NO_CACHE_FLAG])
            .file(path);
        self.execute(&invocation, None, None)
    }

    /// Builds the context found in `dir` (no `-f`), with trailing options.
    ///
    /// # Errors
    ///
    /// See [`BuildInvoker::run`].
    pub fn build_in_dir(&self, dir: &Path, options: &[&str]) -> Result<CommandOutcome> {
        self.run(BuildRunConfig::in_dir(dir).build_options(options.iter().copied()))
    }

    /// Pulls an image (`pull <image>`).
    ///
    /// # Errors
    ///
    /// Whatever the process runner reports.
    pub fn pull(&self, image: &str) -> Result<CommandOutcome> {
        self.execute(&BuildInvocation::pull(image), None, None)
    }

    fn execute(
        &self,
        invocation: &BuildInvocation,
        working_dir: Option<&Path>,
        output: Option<&mut dyn Write>,
    ) -> Result<CommandOutcome> {
        let command = CommandSpec::new(&self.program)
            .args(invocation.to_args())
            .current_dir_opt(working_dir);
        tracing::debug!(
            subcommand = %invocation.subcommand,
            file = ?invocation.file,
            "invoking build tool"
        );
        self.runner.run(&command, output)
    }
}
