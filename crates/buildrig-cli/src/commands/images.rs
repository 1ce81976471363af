//! `buildrig pull`, `buildrig digest`, and `buildrig rmi`.

use anyhow::Context;
use buildrig_sdk::Harness;
use clap::Args;

use super::emit;

/// Arguments shared by the single-image commands.
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image name or reference, e.g. `alpine:3.19`.
    pub image: String,
}

/// Pulls an image through the build tool.
///
/// # Errors
///
/// Returns an error if the pull fails.
pub fn pull(harness: &Harness, args: &ImageArgs) -> anyhow::Result<()> {
    let _ = harness
        .build_tool()?
        .pull(&args.image)
        .with_context(|| format!("pulling {}", args.image))?;
    emit(harness, &format!("pulled {}", args.image))
}

/// Prints the image's digest.
///
/// # Errors
///
/// Returns an error if the runtime fails or reports no usable digest.
pub fn digest(harness: &Harness, args: &ImageArgs) -> anyhow::Result<()> {
    let digest = harness
        .images()?
        .digest_of(&args.image)
        .with_context(|| format!("inspecting {}", args.image))?;
    emit(harness, digest.as_str())
}

/// Removes the image from the runtime.
///
/// # Errors
///
/// Returns an error if the runtime refuses the removal.
pub fn remove(harness: &Harness, args: &ImageArgs) -> anyhow::Result<()> {
    harness
        .images()?
        .remove(&args.image)
        .with_context(|| format!("removing {}", args.image))?;
    emit(harness, &format!("removed {}", args.image))
}
