//! Extraction and rendering of one concrete import cycle

use crate::graph::ModuleGraph;
use crate::model::ModuleId;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// One module on a reported cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleHop {
    #[serde(skip)]
    pub module: ModuleId,
    pub name: String,
    pub path: PathBuf,
    /// Line at which the previous hop imports this one. For the first hop of a
    /// self import this is the self-import line; otherwise `None`.
    pub line: Option<u32>,
}

/// An ordered cycle, empty when no cycle was found along the descent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CyclePath {
    hops: Vec<CycleHop>,
}

impl CyclePath {
    fn from_modules(graph: &ModuleGraph, modules: &[ModuleId]) -> Self {
        let hops = modules
            .iter()
            .enumerate()
            .map(|(i, &module)| {
                let node = &graph[module];
                let importer = if i == 0 {
                    (modules.len() == 1).then_some(module)
                } else {
                    Some(modules[i - 1])
                };
                CycleHop {
                    module,
                    name: node.name.clone(),
                    path: node.canonical_path.clone(),
                    line: importer
                        .and_then(|from| node.first_import_line_from(&graph[from].canonical_path)),
                }
            })
            .collect();
        Self { hops }
    }

    pub fn hops(&self) -> &[CycleHop] {
        &self.hops
    }

    pub fn modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.hops.iter().map(|h| h.module)
    }

    pub fn names(&self) -> Vec<&str> {
        self.hops.iter().map(|h| h.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

/// `a -> b: Line 1 -> c: Line 4 =>> a`
impl fmt::Display for CyclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.hops.first() else {
            return Ok(());
        };

        write!(f, "{}", first.name)?;
        if self.hops.len() == 1 {
            write!(f, " -> {}: Line {}", first.name, LineLabel(first.line))?;
        }
        for hop in &self.hops[1..] {
            write!(f, " -> {}: Line {}", hop.name, LineLabel(hop.line))?;
        }
        write!(f, " =>> {}", first.name)
    }
}

struct LineLabel(Option<u32>);

impl fmt::Display for LineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, "{line}"),
            None => f.write_str("?"),
        }
    }
}

/// Follow imports from `root` until a module repeats and return the modules
/// accumulated on the way, excluding the repeated one.
///
/// At each module the edges are scanned in order: a target seen before ends
/// the walk, a target with imports of its own is descended into, and a leaf
/// target is marked seen and skipped. A module whose edges run out yields an
/// empty path.
pub fn extract_cycle_path(graph: &ModuleGraph, root: ModuleId) -> CyclePath {
    let mut acc: Vec<ModuleId> = Vec::new();
    let mut seen: HashSet<ModuleId> = HashSet::new();
    let mut current = root;

    'descend: loop {
        let Some(node) = graph.node(current) else {
            return CyclePath::default();
        };

        for edge in &node.outgoing {
            let target = edge.target;
            if !seen.insert(target) {
                return CyclePath::from_modules(graph, &acc);
            }
            if graph[target].has_imports() {
                acc.push(target);
                current = target;
                continue 'descend;
            }
        }

        return CyclePath::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImportEdge;

    fn graph_with(names: &[&str], edges: &[(usize, usize, u32)]) -> (ModuleGraph, Vec<ModuleId>) {
        let mut graph = ModuleGraph::new();
        let ids: Vec<_> = names
            .iter()
            .map(|n| graph.get_or_create(format!("/p/{}.py", n.replace('.', "/")), *n))
            .collect();
        for &(from, to, line) in edges {
            graph.add_import(
                ids[from],
                ImportEdge {
                    target: ids[to],
                    line,
                    scope: None,
                },
            );
        }
        (graph, ids)
    }

    #[test]
    fn test_mutual_import_path() {
        let (graph, ids) = graph_with(&["a", "b"], &[(0, 1, 1), (1, 0, 1)]);
        let path = extract_cycle_path(&graph, ids[0]);

        assert_eq!(path.names(), vec!["b", "a"]);
        insta::assert_snapshot!(path.to_string(), @"b -> a: Line 1 =>> b");
    }

    #[test]
    fn test_line_is_taken_from_previous_hop() {
        let (graph, ids) = graph_with(
            &["main", "x", "y", "z"],
            &[(0, 1, 2), (1, 2, 7), (2, 3, 3), (3, 1, 9)],
        );
        let path = extract_cycle_path(&graph, ids[0]);

        insta::assert_snapshot!(path.to_string(), @"x -> y: Line 7 -> z: Line 3 =>> x");
    }

    #[test]
    fn test_leaf_targets_are_skipped() {
        let (graph, ids) = graph_with(
            &["a", "os", "b"],
            &[(0, 1, 1), (0, 2, 2), (2, 0, 1)],
        );
        let path = extract_cycle_path(&graph, ids[0]);

        assert_eq!(path.names(), vec!["b", "a"]);
    }

    #[test]
    fn test_dead_end_is_empty() {
        let (graph, ids) = graph_with(&["a", "b", "c"], &[(0, 1, 1), (1, 2, 1)]);
        let path = extract_cycle_path(&graph, ids[0]);

        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_self_import_renders_closing_hop() {
        let (graph, ids) = graph_with(&["a"], &[(0, 0, 4)]);
        let path = extract_cycle_path(&graph, ids[0]);

        assert_eq!(path.len(), 1);
        insta::assert_snapshot!(path.to_string(), @"a -> a: Line 4 =>> a");
    }

    #[test]
    fn test_each_call_starts_fresh() {
        let (graph, ids) = graph_with(&["a", "b"], &[(0, 1, 1), (1, 0, 1)]);
        let first = extract_cycle_path(&graph, ids[0]);
        let second = extract_cycle_path(&graph, ids[0]);

        assert_eq!(first, second);
    }

    #[test]
    fn test_json_shape() {
        let (graph, ids) = graph_with(&["a", "b"], &[(0, 1, 1), (1, 0, 3)]);
        let path = extract_cycle_path(&graph, ids[0]);
        let json = serde_json::to_value(&path).unwrap();

        assert_eq!(json[0]["name"], "b");
        assert_eq!(json[0]["line"], serde_json::Value::Null);
        assert_eq!(json[1]["name"], "a");
        assert_eq!(json[1]["line"], 3);
    }
}
