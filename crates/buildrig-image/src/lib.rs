//! # buildrig-image
//!
//! Inspection of build results through the container runtime CLI.
//!
//! [`ImageInspector`](inspector::ImageInspector) looks up an image's
//! identifier (`images -q`) and removes images after a test (`rmi`).

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod inspector;

pub use inspector::ImageInspector;
