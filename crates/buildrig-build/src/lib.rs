//! # buildrig-build
//!
//! Drives the build tool under test.
//!
//! - **Invocation**: [`BuildInvocation`](invocation::BuildInvocation) holds
//!   global options, subcommand, build file and per-run options, and
//!   serializes them in the order the tool parses them.
//! - **Config**: [`BuildRunConfig`](config::BuildRunConfig) describes one
//!   build run (source, options, working directory, output sink).
//! - **Invoker**: [`BuildInvoker`](invoker::BuildInvoker) materializes
//!   inline build files and runs the tool through the process runner.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod config;
pub mod invocation;
pub mod invoker;

pub use config::{BuildRunConfig, BuildSource};
pub use invocation::{BuildInvocation, Subcommand, NO_CACHE_FLAG};
pub use invoker::BuildInvoker;
