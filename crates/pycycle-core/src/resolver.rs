//! Import specifier -> canonical module path

use std::path::{Path, PathBuf};

/// Extension appended to resolved module paths by default.
pub const SOURCE_EXTENSION: &str = "py";

/// Maps an import specifier to the path of the module it names.
pub trait ModuleResolver {
    /// `relative_level` is the number of leading dots. For relative imports
    /// `resolution_root` is the importing file's directory.
    fn resolve(&self, resolution_root: &Path, specifier: &str, relative_level: u32) -> Option<PathBuf>;
}

/// Dotted-path resolver. Pure path arithmetic, never touches the filesystem.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    extension: String,
}

impl SourceResolver {
    pub fn new() -> Self {
        Self::with_extension(SOURCE_EXTENSION)
    }

    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleResolver for SourceResolver {
    fn resolve(&self, resolution_root: &Path, specifier: &str, relative_level: u32) -> Option<PathBuf> {
        if resolution_root.as_os_str().is_empty() {
            return None;
        }

        let segments: Vec<&str> = specifier
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            return None;
        }

        // One dot is the importing package itself; every extra dot is a parent.
        let mut base = resolution_root.to_path_buf();
        for _ in 1..relative_level {
            match base.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => base = parent.to_path_buf(),
                _ => break,
            }
        }

        let (last, packages) = segments.split_last()?;
        for package in packages {
            base.push(package);
        }
        base.push(format!("{}.{}", last, self.extension));
        Some(base)
    }
}

/// Resolve with the default `.py` extension.
pub fn resolve(resolution_root: &Path, specifier: &str, relative_level: u32) -> Option<PathBuf> {
    SourceResolver::new().resolve(resolution_root, specifier, relative_level)
}
