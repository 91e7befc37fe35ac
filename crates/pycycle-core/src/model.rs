//! Core data structures for the module graph

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Dense identifier of a module inside one [`ModuleGraph`](crate::ModuleGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed import from one module to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    pub target: ModuleId,
    /// 1-based line of the import statement in the importing file.
    pub line: u32,
    /// Innermost function/class the statement sits in. `None` means module level.
    pub scope: Option<String>,
}

impl ImportEdge {
    pub fn is_deferred(&self) -> bool {
        self.scope.is_some()
    }
}

/// One source module, either scanned or only known as an import target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub id: ModuleId,
    /// File stem for scanned files, import specifier for stubs.
    pub name: String,
    pub canonical_path: PathBuf,
    /// Edges in the textual order of the import statements.
    pub outgoing: Vec<ImportEdge>,
    /// Importer canonical path -> lines at which it imports this module.
    pub incoming: HashMap<PathBuf, Vec<u32>>,
    /// Local function/class definitions and their lines.
    pub definitions: HashMap<String, u32>,
    /// Line -> names imported by a statement inside a function/class body.
    pub deferred_imports: BTreeMap<u32, Vec<String>>,
    /// Whether this module's own file was ingested.
    pub scanned: bool,
}

impl ModuleNode {
    pub fn new(id: ModuleId, name: impl Into<String>, canonical_path: PathBuf) -> Self {
        Self {
            id,
            name: name.into(),
            canonical_path,
            outgoing: Vec::new(),
            incoming: HashMap::new(),
            definitions: HashMap::new(),
            deferred_imports: BTreeMap::new(),
            scanned: false,
        }
    }

    /// A stub is an import target whose file was never scanned.
    pub fn is_stub(&self) -> bool {
        !self.scanned
    }

    pub fn has_imports(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// First line at which `importer` imports this module.
    pub fn first_import_line_from(&self, importer: &Path) -> Option<u32> {
        self.incoming
            .get(importer)
            .and_then(|lines| lines.first().copied())
    }
}
