//! Creation of fixture directories and scratch files.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use buildrig_common::config::HarnessConfig;
use buildrig_common::constants::TEMP_FILE_PREFIX;
use buildrig_common::error::{HarnessError, Result};
use buildrig_common::types::VerbosityLevel;
use buildrig_exec::Console;

use crate::resource::TempResource;

/// Allocates isolated temporary paths for build scenarios.
///
/// Every allocation gets a fresh random name, so concurrently running
/// tests never share a fixture path and no directory lock is needed.
#[derive(Debug, Clone)]
pub struct TempWorkspace {
    base: PathBuf,
    scratch: PathBuf,
    verbosity: VerbosityLevel,
    console: Console,
}

impl TempWorkspace {
    /// Creates a workspace allocating fixtures under `base` and single
    /// files under `scratch`. Neither directory is touched until used.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>, scratch: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            scratch: scratch.into(),
            verbosity: VerbosityLevel::Quiet,
            console: Console::stdio(),
        }
    }

    /// Creates a workspace from the harness configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the default fixture base cannot be determined.
    pub fn from_config(config: &HarnessConfig, console: Console) -> Result<Self> {
        let workspace = Self::new(config.fixture_base()?, config.scratch_dir());
        Ok(workspace.with_console(config.verbosity, console))
    }

    /// Sets where fixture listings are printed at the highest verbosity.
    #[must_use]
    pub fn with_console(mut self, verbosity: VerbosityLevel, console: Console) -> Self {
        self.verbosity = verbosity;
        self.console = console;
        self
    }

    /// Returns the fixture base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the scratch directory for single files.
    #[must_use]
    pub fn scratch(&self) -> &Path {
        &self.scratch
    }

    /// Creates a uniquely named directory whose name starts with `prefix`
    /// and writes every `relative path -> content` entry into it.
    ///
    /// Parent directories of nested entries are created as needed. On any
    /// failure the partially populated directory is removed before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Filesystem` if a path is absolute, empty,
    /// escapes the fixture, is listed twice, conflicts with another entry,
    /// or if any directory or file cannot be created.
    pub fn create_fixture<I, P, C>(&self, prefix: &str, files: I) -> Result<TempResource>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<Path>,
        C: AsRef<[u8]>,
    {
        validate_prefix(prefix)?;
        let entries = validate_entries(files)?;

        ensure_base_dir(&self.base)?;
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&self.base)
            .map_err(|source| HarnessError::Filesystem {
                path: self.base.clone(),
                source,
            })?;
        let fixture = TempResource::dir(dir);

        if let Err(e) = populate(fixture.path(), &entries) {
            fixture.discard();
            return Err(e);
        }

        tracing::info!(
            path = %fixture.path().display(),
            files = entries.len(),
            "fixture created"
        );
        self.report_fixture(fixture.path(), &entries);
        Ok(fixture)
    }

    /// Writes `content` to a uniquely named file in the scratch directory.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Filesystem` if the file cannot be created or
    /// written; nothing is left behind in that case.
    pub fn create_temp_file(&self, content: impl AsRef<[u8]>) -> Result<TempResource> {
        ensure_dir(&self.scratch)?;
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile_in(&self.scratch)
            .map_err(|source| HarnessError::Filesystem {
                path: self.scratch.clone(),
                source,
            })?;

        let path = file.path().to_path_buf();
        file.write_all(content.as_ref())
            .and_then(|()| file.flush())
            .map_err(|source| HarnessError::Filesystem {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "temp file created");
        Ok(TempResource::file(file.into_temp_path()))
    }

    fn report_fixture(&self, path: &Path, entries: &[(PathBuf, Vec<u8>)]) {
        if !self.verbosity.mirrors_output() {
            return;
        }
        let listing: BTreeMap<String, String> = entries
            .iter()
            .map(|(rel, content)| {
                (
                    rel.display().to_string(),
                    String::from_utf8_lossy(content).into_owned(),
                )
            })
            .collect();
        let report = format!(
            "temp directory: {}\n  with files: {listing:#?}",
            path.display()
        );
        if let Err(e) = self.console.line(&report) {
            tracing::warn!(error = %e, "failed to print fixture listing");
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| HarnessError::Filesystem {
        path: dir.to_path_buf(),
        source,
    })
}

/// Creates the fixture base, giving a freshly created base mode 0755.
#[cfg(unix)]
fn ensure_base_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    let fs_err = |source| HarnessError::Filesystem {
        path: dir.to_path_buf(),
        source,
    };
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(dir)
        .map_err(fs_err)?;
    // The umask may have narrowed the mode.
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).map_err(fs_err)
}

#[cfg(not(unix))]
fn ensure_base_dir(dir: &Path) -> Result<()> {
    ensure_dir(dir)
}

/// The prefix becomes part of a directory name directly under the base.
fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.contains(['/', '\\']) || prefix.contains("..") {
        return Err(HarnessError::invalid_path(
            prefix,
            "fixture prefix must be a plain name",
        ));
    }
    Ok(())
}

/// Checks every relative path before anything is created on disk.
fn validate_entries<I, P, C>(files: I) -> Result<Vec<(PathBuf, Vec<u8>)>>
where
    I: IntoIterator<Item = (P, C)>,
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    for (rel, content) in files {
        let normalized = normalize_relative(rel.as_ref())?;
        if !seen.insert(normalized.clone()) {
            return Err(HarnessError::invalid_path(
                rel.as_ref(),
                "path is listed more than once",
            ));
        }
        entries.push((normalized, content.as_ref().to_vec()));
    }
    Ok(entries)
}

/// Strips `.` components and rejects anything that could leave the fixture.
fn normalize_relative(rel: &Path) -> Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(HarnessError::invalid_path(
                    rel,
                    "parent components are not allowed",
                ));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(HarnessError::invalid_path(rel, "path must be relative"));
            }
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err(HarnessError::invalid_path(rel, "path is empty"));
    }
    Ok(normalized)
}

fn populate(root: &Path, entries: &[(PathBuf, Vec<u8>)]) -> Result<()> {
    for (rel, content) in entries {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        std::fs::write(&path, content).map_err(|source| HarnessError::Filesystem {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}
