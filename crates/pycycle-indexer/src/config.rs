//! Read options, `[tool.pycycle]` in pyproject.toml, and ignore rules

use crate::error::ConfigError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use pycycle_core::SOURCE_EXTENSION;
use serde::Deserialize;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// Directory and file names skipped unless the caller says otherwise.
pub const DEFAULT_IGNORES: [&str; 7] = [".hg", ".svn", ".git", ".tox", "__pycache__", "env", "venv"];

/// Project configuration file looked up in the scanned root.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Options for [`read_project`](crate::read_project).
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Extra names (basename of each entry is used) or glob patterns to skip,
    /// on top of [`DEFAULT_IGNORES`].
    pub ignore: Vec<String>,
    /// Forced source encoding. `None` honours coding cookies, then UTF-8.
    pub encoding: Option<String>,
    /// Stop walking the tree once this much time has passed.
    pub deadline: Option<Duration>,
    /// Extension of source files, also appended by the resolver.
    pub extension: String,
    /// Merge `[tool.pycycle]` from the root's pyproject.toml.
    pub use_pyproject: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            encoding: None,
            deadline: None,
            extension: SOURCE_EXTENSION.to_string(),
            use_pyproject: true,
        }
    }
}

impl ReadOptions {
    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn without_pyproject(mut self) -> Self {
        self.use_pyproject = false;
        self
    }

    /// Fill in settings from the project file. Explicit options win; ignore
    /// lists are combined.
    pub fn merge(mut self, section: PycycleSection) -> Self {
        self.ignore.extend(section.ignore);
        if self.encoding.is_none() {
            self.encoding = section.encoding;
        }
        if self.deadline.is_none() {
            self.deadline = section.timeout.map(Duration::from_secs);
        }
        self
    }
}

/// The `[tool.pycycle]` table. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PycycleSection {
    pub ignore: Vec<String>,
    pub encoding: Option<String>,
    /// Scan deadline in seconds.
    pub timeout: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: Tools,
}

#[derive(Debug, Default, Deserialize)]
struct Tools {
    pycycle: Option<PycycleSection>,
}

/// Load `[tool.pycycle]` from `<root>/pyproject.toml`, if both exist.
pub fn load_pyproject(root: &Path) -> Result<Option<PycycleSection>, ConfigError> {
    let path = root.join(PYPROJECT_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let project: PyProject =
        toml::from_str(&text).map_err(|source| ConfigError::Toml { path: path.clone(), source })?;

    if project.tool.pycycle.is_some() {
        tracing::debug!("Loaded [tool.pycycle] from {}", path.display());
    }
    Ok(project.tool.pycycle)
}

/// Names and glob patterns of entries the walk skips.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    names: HashSet<String>,
    globs: GlobSet,
}

impl IgnoreSet {
    /// Defaults plus `extra`. Entries containing glob metacharacters are
    /// compiled as patterns, others are reduced to their basename.
    pub fn new(extra: &[String]) -> Result<Self, ConfigError> {
        Self::compile(extra, true)
    }

    /// Like [`IgnoreSet::new`], but a pattern that does not compile is
    /// logged and dropped.
    pub fn skipping_invalid(extra: &[String]) -> Self {
        Self::compile(extra, false).unwrap_or_else(|err| {
            tracing::warn!("Falling back to default ignores: {}", err);
            Self::default()
        })
    }

    fn compile(extra: &[String], strict: bool) -> Result<Self, ConfigError> {
        let mut names: HashSet<String> = DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect();
        let mut builder = GlobSetBuilder::new();

        for entry in extra {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.contains(['*', '?', '[', '{']) {
                match Glob::new(entry) {
                    Ok(glob) => {
                        builder.add(glob);
                    }
                    Err(source) => {
                        let err = ConfigError::Pattern {
                            pattern: entry.to_string(),
                            source,
                        };
                        if strict {
                            return Err(err);
                        }
                        tracing::warn!("Skipping {}", err);
                    }
                }
            } else {
                let name = Path::new(entry)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| entry.to_string());
                names.insert(name);
            }
        }

        let globs = builder.build().map_err(|source| ConfigError::Pattern {
            pattern: extra.join(","),
            source,
        })?;
        Ok(Self { names, globs })
    }

    pub fn is_ignored(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n)) || self.globs.is_match(name)
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
            globs: GlobSet::empty(),
        }
    }
}
