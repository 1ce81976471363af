//! # buildrig-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the entire buildrig workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the primitives that the process runner,
//! fixture manager, build invoker, and image inspector build upon.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
