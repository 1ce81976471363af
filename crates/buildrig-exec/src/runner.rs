//! Launching external processes and routing their output.
//!
//! Routing is decided per call from the runner's [`VerbosityLevel`]:
//!
//! | level | echo `Running: ...` | stdout                         | stderr   |
//! |-------|---------------------|--------------------------------|----------|
//! | 0     | no                  | sink, or discarded             | discarded|
//! | 1     | yes                 | sink, or discarded             | discarded|
//! | 2     | yes                 | sink and console, or console   | console  |

use std::io::{self, Write};
use std::process::{Command, Stdio};

use buildrig_common::error::{HarnessError, Result};
use buildrig_common::types::VerbosityLevel;

use crate::command::{CommandOutcome, CommandSpec};
use crate::console::{Console, ConsoleErr};
use crate::tee::TeeWriter;

/// Blocking launcher for external commands.
///
/// Every call spawns one process and waits for it to exit. There is no
/// timeout and no retry: a failure is reported to the caller exactly once.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    verbosity: VerbosityLevel,
    console: Console,
}

impl ProcessRunner {
    /// Creates a runner writing to the given console.
    #[must_use]
    pub const fn new(verbosity: VerbosityLevel, console: Console) -> Self {
        Self { verbosity, console }
    }

    /// Returns the verbosity this runner was built with.
    #[must_use]
    pub const fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Returns the console this runner writes to.
    #[must_use]
    pub const fn console(&self) -> &Console {
        &self.console
    }

    /// Prints a diagnostic line to the console at the highest verbosity.
    pub fn debug(&self, message: &str) {
        if !self.verbosity.mirrors_output() {
            return;
        }
        if let Err(e) = self.console.line(message) {
            tracing::warn!(error = %e, "failed to write debug line to console");
        }
    }

    /// Runs a command to completion, streaming its stdout into `sink`.
    ///
    /// # Errors
    ///
    /// - `HarnessError::Launch` if the executable cannot be started.
    /// - `HarnessError::Execution` if it exits unsuccessfully.
    /// - `HarnessError::OutputStream` if output cannot be forwarded.
    pub fn run(
        &self,
        command: &CommandSpec,
        sink: Option<&mut dyn Write>,
    ) -> Result<CommandOutcome> {
        let command_line = command.render();
        let stream_err = |source: io::Error| HarnessError::OutputStream {
            command: command_line.clone(),
            source,
        };

        if self.verbosity.echoes_commands() {
            self.console
                .line(&format!("Running: {command_line}"))
                .map_err(stream_err)?;
        }

        let mirror = self.verbosity.mirrors_output();
        let capture_stdout = sink.is_some() || mirror;

        let mut cmd = Command::new(command.program());
        let _ = cmd
            .args(command.arguments())
            .stdin(Stdio::null())
            .stdout(if capture_stdout { Stdio::piped() } else { Stdio::null() })
            .stderr(if mirror { Stdio::piped() } else { Stdio::null() });
        if let Some(dir) = command.working_dir() {
            let _ = cmd.current_dir(dir);
        }

        tracing::debug!(command = %command_line, cwd = ?command.working_dir(), "launching process");
        let mut child = cmd.spawn().map_err(|source| HarnessError::Launch {
            command: command_line.clone(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let console = mirror.then_some(&self.console);

        let (copied, forwarded_err) = std::thread::scope(|scope| {
            let err_forwarder = stderr.map(|mut pipe| {
                scope.spawn(move || io::copy(&mut pipe, &mut ConsoleErr(&self.console)))
            });

            let copied = match stdout {
                Some(mut pipe) => io::copy(&mut pipe, &mut TeeWriter::new(sink, console)),
                None => Ok(0),
            };

            let forwarded_err = err_forwarder.map_or(Ok(0), |handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stderr forwarder panicked")))
            });
            (copied, forwarded_err)
        });

        let status = child.wait().map_err(|source| HarnessError::Launch {
            command: command_line.clone(),
            source,
        })?;
        tracing::debug!(command = %command_line, %status, "process exited");

        if !status.success() {
            return Err(HarnessError::Execution {
                command: command_line,
                status,
            });
        }
        let forwarded_bytes = copied.map_err(stream_err)?;
        let _ = forwarded_err.map_err(stream_err)?;

        Ok(CommandOutcome {
            args: command.arguments().to_vec(),
            command_line,
            status,
            forwarded_bytes,
        })
    }

    /// Runs a command and returns everything it wrote to stdout.
    ///
    /// # Errors
    ///
    /// Same as [`ProcessRunner::run`].
    pub fn capture(&self, command: &CommandSpec) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let _ = self.run(command, Some(&mut buf))?;
        Ok(buf)
    }
}
