//! Populates a [`ModuleGraph`] from parse events

use crate::events::ParsedModule;
use crate::graph::ModuleGraph;
use crate::model::{ImportEdge, ModuleId};
use crate::resolver::{ModuleResolver, SourceResolver};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A source file the front-end could not turn into parse events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Finished graph plus the per-file failures collected on the way.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub graph: ModuleGraph,
    pub failures: Vec<ParseFailure>,
}

impl BuildOutput {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Incremental graph builder for one analysis run.
pub struct GraphBuilder<R = SourceResolver> {
    graph: ModuleGraph,
    project_root: PathBuf,
    resolver: R,
    failures: Vec<ParseFailure>,
}

impl GraphBuilder<SourceResolver> {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_resolver(project_root, SourceResolver::new())
    }
}

impl<R: ModuleResolver> GraphBuilder<R> {
    pub fn with_resolver(project_root: impl Into<PathBuf>, resolver: R) -> Self {
        Self {
            graph: ModuleGraph::new(),
            project_root: project_root.into(),
            resolver,
            failures: Vec::new(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    /// Ingest one scanned module. The first module ingested becomes the root.
    pub fn ingest(&mut self, module: &ParsedModule) -> ModuleId {
        let id = self
            .graph
            .get_or_create(module.path.clone(), module.module_name());
        self.graph.set_root_if_unset(id);

        if self.graph[id].scanned {
            tracing::warn!("Module scanned twice, keeping first scan: {}", module.path.display());
            return id;
        }
        if let Some(node) = self.graph.node_mut(id) {
            node.scanned = true;
        }

        let module_dir = module.path.parent().unwrap_or_else(|| Path::new(""));

        for event in &module.imports {
            let resolution_root = if event.relative_level > 0 {
                module_dir
            } else {
                self.project_root.as_path()
            };

            let Some(target_path) =
                self.resolver
                    .resolve(resolution_root, &event.specifier, event.relative_level)
            else {
                tracing::trace!(
                    "Unresolved import '{}' at {}:{}",
                    event.specifier,
                    module.path.display(),
                    event.line
                );
                continue;
            };

            let target = self.graph.get_or_create(target_path, event.specifier.clone());
            self.graph.add_import(
                id,
                ImportEdge {
                    target,
                    line: event.line,
                    scope: event.enclosing_scope.clone(),
                },
            );

            if event.enclosing_scope.is_some() {
                if let Some(node) = self.graph.node_mut(id) {
                    node.deferred_imports
                        .entry(event.line)
                        .or_default()
                        .extend(event.imported_names.iter().cloned());
                }
            }
        }

        if let Some(node) = self.graph.node_mut(id) {
            for definition in &module.definitions {
                node.definitions
                    .entry(definition.name.clone())
                    .or_insert(definition.line);
            }
        }

        tracing::debug!(
            "Ingested {} ({} imports, {} definitions)",
            module.path.display(),
            module.imports.len(),
            module.definitions.len()
        );
        id
    }

    /// Record a file that could not be parsed. Scanning continues.
    pub fn record_failure(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        let failure = ParseFailure {
            path: path.into(),
            reason: reason.into(),
        };
        tracing::warn!("Parsing of file failed: {}", failure.path.display());
        tracing::debug!("{}", failure.reason);
        self.failures.push(failure);
    }

    pub fn finish(self) -> BuildOutput {
        if !self.failures.is_empty() {
            tracing::warn!(
                "{} file(s) failed to parse; the source may target a different Python version",
                self.failures.len()
            );
        }
        BuildOutput {
            graph: self.graph,
            failures: self.failures,
        }
    }
}
