//! Test utilities for building graphs from parse events

use crate::builder::GraphBuilder;
use crate::events::{DefinitionEvent, ImportEvent, ParsedModule};
use crate::graph::ModuleGraph;

pub const PROJECT_ROOT: &str = "/project";

/// Fluent description of one scanned file under [`PROJECT_ROOT`].
pub struct FileSpec {
    module: ParsedModule,
}

impl FileSpec {
    pub fn new(relative_path: &str) -> Self {
        Self {
            module: ParsedModule::new(format!("{}/{}", PROJECT_ROOT, relative_path)),
        }
    }

    pub fn import(mut self, specifier: &str, line: u32) -> Self {
        self.module
            .imports
            .push(ImportEvent::module_level(specifier, line));
        self
    }

    pub fn import_from(mut self, specifier: &str, names: &[&str], line: u32) -> Self {
        self.module
            .imports
            .push(ImportEvent::module_level(specifier, line).names(names.iter().copied()));
        self
    }

    pub fn relative_import(mut self, level: u32, specifier: &str, line: u32) -> Self {
        self.module.imports.push(
            ImportEvent::module_level(specifier, line)
                .relative(level)
                .names([specifier]),
        );
        self
    }

    pub fn deferred_import_from(mut self, scope: &str, specifier: &str, names: &[&str], line: u32) -> Self {
        self.module.imports.push(
            ImportEvent::module_level(specifier, line)
                .names(names.iter().copied())
                .inside(scope),
        );
        self
    }

    pub fn define(mut self, name: &str, line: u32) -> Self {
        self.module.definitions.push(DefinitionEvent::new(name, line));
        self
    }
}

/// Ingest the files in order; the first one becomes the root.
pub fn build_graph(files: Vec<FileSpec>) -> ModuleGraph {
    let mut builder = GraphBuilder::new(PROJECT_ROOT);
    for file in &files {
        builder.ingest(&file.module);
    }
    builder.finish().graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_graph_roots_first_file() {
        let graph = build_graph(vec![FileSpec::new("a.py").import("b", 1), FileSpec::new("b.py")]);
        let root = graph.root().unwrap();

        assert_eq!(graph[root].name, "a");
        assert_eq!(graph.module_count(), 2);
    }
}
