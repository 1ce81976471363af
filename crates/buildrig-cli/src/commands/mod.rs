//! CLI command definitions and dispatch.

pub mod build;
pub mod fixture;
pub mod images;

use std::path::PathBuf;

use anyhow::Context;
use buildrig_common::config::{HarnessConfig, ToolLocation};
use buildrig_common::constants;
use buildrig_common::types::VerbosityLevel;
use buildrig_sdk::Harness;
use clap::{Args, Parser, Subcommand};

/// buildrig — drive a container-image build tool the way the integration suite does.
#[derive(Parser, Debug)]
#[command(name = constants::APP_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Harness settings; flags win over `BUILDRIG_*` variables, which win over `--config`.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Console verbosity: 0 quiet, 1 echo commands, 2 also mirror output.
    #[arg(short, long, global = true)]
    pub verbosity: Option<VerbosityLevel>,

    /// Path to the build tool executable.
    #[arg(long, global = true)]
    pub build_tool: Option<PathBuf>,

    /// Path to the container runtime executable.
    #[arg(long, global = true)]
    pub runtime: Option<PathBuf>,

    /// JSON harness configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Layers the configuration file, the environment, and the flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or an
    /// environment override is invalid.
    pub fn resolve_config(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<HarnessConfig> {
        let base = match &self.config {
            Some(path) => HarnessConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => HarnessConfig::default(),
        };
        let mut config = base.with_env_overrides(lookup)?;
        if let Some(level) = self.verbosity {
            config.verbosity = level;
        }
        if let Some(path) = &self.build_tool {
            config.build_tool = ToolLocation::Fixed(path.clone());
        }
        if let Some(path) = &self.runtime {
            config.runtime = ToolLocation::Fixed(path.clone());
        }
        Ok(config)
    }

    /// Builds a harness writing to real stdio.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a tool cannot be located.
    pub fn harness(&self) -> anyhow::Result<Harness> {
        let config = self.resolve_config(|var| std::env::var(var).ok())?;
        tracing::debug!(?config, "resolved harness configuration");
        Ok(Harness::from_config(&config)?)
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a build file (`build -f <file>`).
    Build(build::BuildArgs),
    /// Build the context in a directory (no `-f`).
    BuildDir(build::BuildDirArgs),
    /// Pull an image through the build tool.
    Pull(images::ImageArgs),
    /// Print the digest the runtime reports for an image.
    Digest(images::ImageArgs),
    /// Remove an image from the runtime.
    Rmi(images::ImageArgs),
    /// Create a fixture directory from `path=content` pairs.
    Fixture(fixture::FixtureArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the harness cannot be built or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let harness = cli.global.harness()?;
    match cli.command {
        Command::Build(args) => build::execute(&harness, args),
        Command::BuildDir(args) => build::execute_dir(&harness, args),
        Command::Pull(args) => images::pull(&harness, &args),
        Command::Digest(args) => images::digest(&harness, &args),
        Command::Rmi(args) => images::remove(&harness, &args),
        Command::Fixture(args) => fixture::execute(&harness, args),
    }
}

/// Writes one line of command output to the harness console.
fn emit(harness: &Harness, line: &str) -> anyhow::Result<()> {
    harness
        .runner()
        .console()
        .line(line)
        .context("writing to stdout")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("buildrig").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = parse(&["digest", "alpine:3.19", "-v", "2", "--runtime", "/opt/docker"]);
        assert_eq!(cli.global.verbosity, Some(VerbosityLevel::Trace));
        assert_eq!(cli.global.runtime, Some(PathBuf::from("/opt/docker")));
        assert!(matches!(cli.command, Command::Digest(ref a) if a.image == "alpine:3.19"));
    }

    #[test]
    fn out_of_range_verbosity_is_rejected() {
        let result = Cli::try_parse_from(["buildrig", "-v", "3", "digest", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_environment() {
        let vars: HashMap<&str, &str> = [
            ("BUILDRIG_VERBOSITY", "1"),
            ("BUILDRIG_BUILD_TOOL", "/env/rocker"),
            ("BUILDRIG_RUNTIME", "/env/docker"),
        ]
        .into_iter()
        .collect();
        let args = GlobalArgs {
            verbosity: Some(VerbosityLevel::Trace),
            build_tool: Some("/flag/rocker".into()),
            ..GlobalArgs::default()
        };

        let config = args
            .resolve_config(|k| vars.get(k).map(|v| (*v).to_string()))
            .expect("config");
        assert_eq!(config.verbosity, VerbosityLevel::Trace);
        assert_eq!(config.build_tool, ToolLocation::Fixed("/flag/rocker".into()));
        assert_eq!(config.runtime, ToolLocation::Fixed("/env/docker".into()));
    }

    #[test]
    fn environment_overrides_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("buildrig.json");
        std::fs::write(&path, r#"{ "verbosity": 2, "runtime": { "fixed": "/file/docker" } }"#)
            .expect("write");
        let args = GlobalArgs {
            config: Some(path),
            ..GlobalArgs::default()
        };

        let config = args
            .resolve_config(|k| (k == "BUILDRIG_VERBOSITY").then(|| "0".to_string()))
            .expect("config");
        assert_eq!(config.verbosity, VerbosityLevel::Quiet);
        assert_eq!(config.runtime, ToolLocation::Fixed("/file/docker".into()));
    }

    #[test]
    fn missing_config_file_reports_path() {
        let args = GlobalArgs {
            config: Some("/nonexistent/buildrig.json".into()),
            ..GlobalArgs::default()
        };
        let err = args.resolve_config(|_| None).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/buildrig.json"));
    }
}
