//! # buildrig-fixture
//!
//! Ephemeral filesystem fixtures for build scenarios.
//!
//! - **Workspace**: [`TempWorkspace`](workspace::TempWorkspace) creates
//!   uniquely named fixture directories under a stable home-relative base,
//!   and single scratch files for inline build-file content.
//! - **Resource**: [`TempResource`](resource::TempResource) owns one created
//!   path and removes it when dropped.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod resource;
pub mod workspace;

pub use resource::TempResource;
pub use workspace::TempWorkspace;
