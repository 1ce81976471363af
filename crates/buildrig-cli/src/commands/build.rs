//! `buildrig build` and `buildrig build-dir`.

use std::path::PathBuf;

use anyhow::Context;
use buildrig_sdk::{BuildRunConfig, CommandOutcome, Harness, NO_CACHE_FLAG};
use clap::Args;

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Build file handed to the tool with `-f`.
    #[arg(short, long, default_value = "Rockerfile")]
    pub file: PathBuf,

    /// Disable the build cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Extra options appended after the file, e.g. `-- --var Tag=v1`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

/// Arguments for the `build-dir` command.
#[derive(Args, Debug)]
pub struct BuildDirArgs {
    /// Directory the tool runs in; its own build file is picked up there.
    pub dir: PathBuf,

    /// Extra options appended after `build`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

/// Executes the `build` command.
///
/// # Errors
///
/// Returns an error if the build tool cannot be started or fails.
pub fn execute(harness: &Harness, args: BuildArgs) -> anyhow::Result<()> {
    let mut options = Vec::with_capacity(args.extra.len() + 1);
    if args.no_cache {
        options.push(NO_CACHE_FLAG.to_string());
    }
    options.extend(args.extra);

    let mut output = Vec::new();
    let outcome = harness
        .build_tool()?
        .run(
            BuildRunConfig::from_file(&args.file)
                .build_options(options)
                .output(&mut output),
        )
        .with_context(|| format!("building {}", args.file.display()))?;
    report(harness, &output, &outcome)
}

/// Executes the `build-dir` command.
///
/// # Errors
///
/// Returns an error if the build tool cannot be started or fails.
pub fn execute_dir(harness: &Harness, args: BuildDirArgs) -> anyhow::Result<()> {
    let mut output = Vec::new();
    let outcome = harness
        .build_tool()?
        .run(
            BuildRunConfig::in_dir(&args.dir)
                .build_options(args.extra)
                .output(&mut output),
        )
        .with_context(|| format!("building in {}", args.dir.display()))?;
    report(harness, &output, &outcome)
}

/// Replays captured tool output unless the runner already mirrored it.
fn report(harness: &Harness, output: &[u8], outcome: &CommandOutcome) -> anyhow::Result<()> {
    if !harness.verbosity().mirrors_output() {
        harness
            .runner()
            .console()
            .write_out(output)
            .context("writing to stdout")?;
    }
    tracing::info!(
        command = %outcome.command_line,
        bytes = outcome.forwarded_bytes,
        "build finished"
    );
    Ok(())
}
