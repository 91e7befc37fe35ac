//! Module registry: one node per canonical path, edges in insertion order

use crate::model::*;
use std::collections::HashMap;
use std::ops::Index;
use std::path::{Path, PathBuf};

/// The import graph of one analysis run.
///
/// Nodes are never removed. The first module marked as scanned becomes the
/// traversal root and stays fixed.
#[derive(Clone, Default)]
pub struct ModuleGraph {
    nodes: Vec<ModuleNode>,
    by_path: HashMap<PathBuf, ModuleId>,
    root: Option<ModuleId>,
}

impl std::fmt::Debug for ModuleGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleGraph")
            .field("module_count", &self.nodes.len())
            .field("import_count", &self.import_count())
            .field("root", &self.root)
            .finish()
    }
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node registered for `path`, creating it with `name` if absent.
    pub fn get_or_create(&mut self, path: impl Into<PathBuf>, name: impl Into<String>) -> ModuleId {
        let path = path.into();
        if let Some(&id) = self.by_path.get(&path) {
            return id;
        }

        let id = ModuleId(self.nodes.len() as u32);
        tracing::trace!("Registering module {} at {}", id.0, path.display());
        self.nodes.push(ModuleNode::new(id, name, path.clone()));
        self.by_path.insert(path, id);
        id
    }

    /// Look up a module by canonical path.
    pub fn lookup(&self, path: &Path) -> Option<ModuleId> {
        self.by_path.get(path).copied()
    }

    /// Get a node by ID.
    pub fn node(&self, id: ModuleId) -> Option<&ModuleNode> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID.
    pub fn node_mut(&mut self, id: ModuleId) -> Option<&mut ModuleNode> {
        self.nodes.get_mut(id.index())
    }

    /// Append an import edge and record the line on the target's incoming map.
    pub fn add_import(&mut self, from: ModuleId, edge: ImportEdge) {
        let importer = self[from].canonical_path.clone();
        let target = edge.target;
        let line = edge.line;

        self.nodes[from.index()].outgoing.push(edge);
        self.nodes[target.index()]
            .incoming
            .entry(importer)
            .or_default()
            .push(line);
    }

    /// Fix the root if none has been chosen yet. Returns the root in effect.
    pub fn set_root_if_unset(&mut self, id: ModuleId) -> ModuleId {
        *self.root.get_or_insert(id)
    }

    pub fn root(&self) -> Option<ModuleId> {
        self.root
    }

    /// Total number of modules, stubs included.
    pub fn module_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of import edges.
    pub fn import_count(&self) -> usize {
        self.nodes.iter().map(|n| n.outgoing.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all modules in creation order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.nodes.iter()
    }

    /// Modules that were only ever seen as import targets.
    pub fn stubs(&self) -> impl Iterator<Item = &ModuleNode> {
        self.nodes.iter().filter(|n| n.is_stub())
    }

    /// Direct import targets of a module, in edge order.
    pub fn imports_of(&self, id: ModuleId) -> impl Iterator<Item = ModuleId> + '_ {
        self.nodes
            .get(id.index())
            .into_iter()
            .flat_map(|n| n.outgoing.iter().map(|e| e.target))
    }
}

impl Index<ModuleId> for ModuleGraph {
    type Output = ModuleNode;

    fn index(&self, id: ModuleId) -> &ModuleNode {
        &self.nodes[id.index()]
    }
}
