//! Description and result of a single external invocation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// An external command: executable, ordered arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Creates a command for the given executable with no arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments, preserving their order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Sets the working directory if one is given; `None` inherits the
    /// harness's own.
    #[must_use]
    pub fn current_dir_opt(mut self, dir: Option<&Path>) -> Self {
        self.cwd = dir.map(Path::to_path_buf);
        self
    }

    /// Returns the executable path.
    #[must_use]
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Returns the argument vector (without the program).
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Returns the working directory, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    /// Renders the command line as echoed to the console and used in errors.
    #[must_use]
    pub fn render(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a completed, successful invocation.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Rendered command line.
    pub command_line: String,
    /// Argument vector passed to the executable.
    pub args: Vec<OsString>,
    /// Exit status (always a success when returned from the runner).
    pub status: ExitStatus,
    /// Number of stdout bytes delivered to the caller's sink.
    pub forwarded_bytes: u64,
}

impl CommandOutcome {
    /// Returns the arguments as lossily converted strings.
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}
