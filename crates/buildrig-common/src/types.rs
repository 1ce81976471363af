//! Domain primitive types used across the buildrig workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MIN_DIGEST_LEN;
use crate::error::{HarnessError, Result};

/// How much of each external invocation is mirrored to the console.
///
/// Fixed for the lifetime of a harness and handed to every component at
/// construction time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum VerbosityLevel {
    /// Nothing is written to the console.
    #[default]
    Quiet,
    /// Command lines are echoed before launch.
    Commands,
    /// Command lines are echoed and child output is tee'd to the console.
    Trace,
}

impl VerbosityLevel {
    /// Returns whether command lines are echoed.
    #[must_use]
    pub const fn echoes_commands(self) -> bool {
        matches!(self, Self::Commands | Self::Trace)
    }

    /// Returns whether child output is mirrored to the console.
    #[must_use]
    pub const fn mirrors_output(self) -> bool {
        matches!(self, Self::Trace)
    }

    /// Returns the numeric level (0, 1, or 2).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Quiet => 0,
            Self::Commands => 1,
            Self::Trace => 2,
        }
    }
}

impl TryFrom<u8> for VerbosityLevel {
    type Error = HarnessError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Quiet),
            1 => Ok(Self::Commands),
            2 => Ok(Self::Trace),
            other => Err(HarnessError::Configuration {
                message: format!("verbosity must be 0, 1, or 2 (got {other})"),
            }),
        }
    }
}

impl From<VerbosityLevel> for u8 {
    fn from(level: VerbosityLevel) -> Self {
        level.as_u8()
    }
}

impl FromStr for VerbosityLevel {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u8 = s.trim().parse().map_err(|_| HarnessError::Configuration {
            message: format!("verbosity must be 0, 1, or 2 (got {s:?})"),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Identifier of a built image as reported by the container runtime.
///
/// Always at least [`MIN_DIGEST_LEN`] characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDigest(String);

impl ImageDigest {
    /// Validates a raw identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns the violated invariant as a message if the trimmed value is
    /// shorter than [`MIN_DIGEST_LEN`] characters.
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_DIGEST_LEN {
            return Err(format!(
                "too short digest (should be at least {MIN_DIGEST_LEN} chars) got: {trimmed:?}"
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the full identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the short (12 character) form of the identifier.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(MIN_DIGEST_LEN)
            .map_or(self.0.as_str(), |(idx, _)| &self.0[..idx])
    }
}

impl fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of an ephemeral filesystem resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TempResourceKind {
    /// A single file.
    File,
    /// A directory tree.
    Directory,
}

impl fmt::Display for TempResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}
