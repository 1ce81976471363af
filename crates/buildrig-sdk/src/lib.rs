//! # buildrig-sdk
//!
//! Public entry point for integration tests driving the build tool.
//!
//! [`Harness`](harness::Harness) resolves the build tool and container
//! runtime once, then hands out a [`BuildInvoker`], an [`ImageInspector`]
//! and a [`TempWorkspace`] that all share one verbosity and console.
//!
//! # Example
//!
//! ```rust,no_run
//! use buildrig_sdk::harness::Harness;
//! use buildrig_sdk::HarnessConfig;
//!
//! # fn main() -> buildrig_sdk::Result<()> {
//! let harness = Harness::from_config(&HarnessConfig::from_env()?)?;
//! let _ = harness.build_tool()?.build("FROM alpine\nTAG buildrig-smoke:latest\n")?;
//! let digest = harness.images()?.digest_of("buildrig-smoke:latest")?;
//! assert!(digest.as_str().len() >= 12);
//! harness.images()?.remove("buildrig-smoke:latest")?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod harness;

pub use buildrig_build::{
    BuildInvocation, BuildInvoker, BuildRunConfig, BuildSource, Subcommand, NO_CACHE_FLAG,
};
pub use buildrig_common::config::{HarnessConfig, ToolLocation};
pub use buildrig_common::error::{HarnessError, Result};
pub use buildrig_common::types::{ImageDigest, TempResourceKind, VerbosityLevel};
pub use buildrig_exec::{CommandOutcome, CommandSpec, Console, ProcessRunner};
pub use buildrig_fixture::{TempResource, TempWorkspace};
pub use buildrig_image::ImageInspector;
pub use harness::Harness;
