//! Parse events handed from a front-end parser to the graph builder

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One import statement target, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEvent {
    /// Dotted module path as written, without leading dots.
    pub specifier: String,
    pub line: u32,
    /// Number of leading dots; 0 for absolute imports.
    pub relative_level: u32,
    /// Names bound by the statement (`from x import a, b` -> `a`, `b`).
    pub imported_names: Vec<String>,
    /// Innermost enclosing function/class, if the statement is not at module level.
    pub enclosing_scope: Option<String>,
}

impl ImportEvent {
    pub fn module_level(specifier: impl Into<String>, line: u32) -> Self {
        Self {
            specifier: specifier.into(),
            line,
            relative_level: 0,
            imported_names: Vec::new(),
            enclosing_scope: None,
        }
    }

    pub fn relative(mut self, level: u32) -> Self {
        self.relative_level = level;
        self
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imported_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn inside(mut self, scope: impl Into<String>) -> Self {
        self.enclosing_scope = Some(scope.into());
        self
    }
}

/// A local function or class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionEvent {
    pub name: String,
    pub line: u32,
}

impl DefinitionEvent {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// Everything the builder needs from one scanned source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModule {
    pub path: PathBuf,
    pub imports: Vec<ImportEvent>,
    pub definitions: Vec<DefinitionEvent>,
}

impl ParsedModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Display name of the module: the file stem.
    pub fn module_name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
