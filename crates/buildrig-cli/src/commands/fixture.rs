//! `buildrig fixture` — lay out a fixture directory for manual runs.

use anyhow::Context;
use buildrig_sdk::Harness;
use clap::Args;

use super::emit;

/// Arguments for the `fixture` command.
#[derive(Args, Debug)]
pub struct FixtureArgs {
    /// Prefix of the generated directory name.
    #[arg(long, default_value = "buildrig_fixture_")]
    pub prefix: String,

    /// Keep the directory instead of removing it on exit.
    #[arg(long)]
    pub keep: bool,

    /// Files as `relative/path=content`; `\n`, `\t` and `\\` are unescaped.
    #[arg(required = true, value_parser = parse_entry)]
    pub files: Vec<(String, String)>,
}

/// Executes the `fixture` command.
///
/// # Errors
///
/// Returns an error if the fixture cannot be created or removed.
pub fn execute(harness: &Harness, args: FixtureArgs) -> anyhow::Result<()> {
    let fixture = harness
        .workspace()
        .create_fixture(
            &args.prefix,
            args.files.iter().map(|(path, content)| (path.as_str(), content.as_str())),
        )
        .context("creating fixture")?;

    if args.keep {
        let path = fixture.keep()?;
        emit(harness, &path.display().to_string())
    } else {
        emit(harness, &fixture.path().display().to_string())?;
        fixture.close()?;
        Ok(())
    }
}

/// Splits `path=content` at the first `=`.
fn parse_entry(raw: &str) -> Result<(String, String), String> {
    let (path, content) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=CONTENT, got {raw:?}"))?;
    if path.is_empty() {
        return Err(format!("empty path in {raw:?}"));
    }
    Ok((path.to_string(), unescape(content)))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
