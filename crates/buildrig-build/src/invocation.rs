//! Build-tool argument vectors.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Flag selecting the build file.
pub const FILE_FLAG: &str = "-f";

/// Flag disabling the build cache.
pub const NO_CACHE_FLAG: &str = "--no-cache";

/// Build-tool subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    /// `build`: run a build file.
    Build,
    /// `pull`: fetch an image.
    Pull,
}

impl Subcommand {
    /// Returns the literal subcommand word.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Pull => "pull",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One build-tool invocation.
///
/// Arguments always serialize as: global options, subcommand, subcommand
/// flags, `-f <file>` (when a file is set), then per-run options. Global
/// options must come before the subcommand because the tool parses them
/// positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    /// Options placed before the subcommand.
    pub global_options: Vec<String>,
    /// The subcommand.
    pub subcommand: Subcommand,
    /// Flags placed right after the subcommand, before `-f`.
    pub subcommand_options: Vec<String>,
    /// Build file passed with `-f`.
    pub file: Option<PathBuf>,
    /// Options and positionals placed after the subcommand and file.
    pub options: Vec<String>,
}

impl BuildInvocation {
    /// A bare `build` invocation.
    #[must_use]
    pub const fn build() -> Self {
        Self {
            global_options: Vec::new(),
            subcommand: Subcommand::Build,
            subcommand_options: Vec::new(),
            file: None,
            options: Vec::new(),
        }
    }

    /// `pull <image>`.
    #[must_use]
    pub fn pull(image: impl Into<String>) -> Self {
        Self {
            global_options: Vec::new(),
            subcommand: Subcommand::Pull,
            subcommand_options: Vec::new(),
            file: None,
            options: vec![image.into()],
        }
    }

    /// Sets the global options.
    #[must_use]
    pub fn global_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the flags that directly follow the subcommand.
    #[must_use]
    pub fn subcommand_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcommand_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the build file.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Sets the per-run options.
    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Serializes the invocation into the tool's argument vector.
    #[must_use]
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.global_options.iter().map(OsString::from).collect();
        args.push(self.subcommand.as_str().into());
        args.extend(self.subcommand_options.iter().map(OsString::from));
        if let Some(file) = &self.file {
            args.push(FILE_FLAG.into());
            args.push(file.as_os_str().to_os_string());
        }
        args.extend(self.options.iter().map(OsString::from));
        args
    }
}
