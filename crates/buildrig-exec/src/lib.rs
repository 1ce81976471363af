//! # buildrig-exec
//!
//! Synchronous execution of external commands for the buildrig harness.
//!
//! - **Command**: [`CommandSpec`](command::CommandSpec) describes one invocation.
//! - **Runner**: [`ProcessRunner`](runner::ProcessRunner) launches it, routes
//!   output according to the configured verbosity, and waits for exit.
//! - **Console**: [`Console`](console::Console) is where echoed command lines
//!   and mirrored output go (real stdio, or an in-memory capture).

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod command;
pub mod console;
pub mod runner;
pub mod tee;

pub use command::{CommandOutcome, CommandSpec};
pub use console::Console;
pub use runner::ProcessRunner;
