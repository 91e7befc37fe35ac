//! Decides whether a repeated edge is deferred behind a function/class body
//!
//! A module-level cyclic import fails while the modules load. An import placed
//! inside a function or class body only runs when that body is invoked, which
//! normally happens after both modules have finished initialising.

use crate::detector::TraversalState;
use crate::graph::ModuleGraph;
use crate::model::ModuleId;
use std::collections::HashSet;

/// Walk parent links up from `target` to the import that started the
/// possible cycle and return its line.
///
/// The ascent stops on a repeated node, when the next parent carries the
/// target's name, or when a parent or grandparent is missing.
pub fn origin_line(graph: &ModuleGraph, state: &TraversalState, target: ModuleId) -> Option<u32> {
    let name = graph.node(target)?.name.as_str();
    let mut node = target;
    let mut seen = HashSet::new();

    while let Some(parent) = state.parent(node) {
        let Some(grandparent) = state.parent(parent) else {
            break;
        };
        node = parent;
        if !seen.insert(node) || graph[grandparent].name == name {
            break;
        }
    }

    let parent = state.parent(node)?;
    graph[node].first_import_line_from(&graph[parent].canonical_path)
}

/// True when one of `previous`'s deferred imports names a definition in
/// `target` that precedes the line which started the cycle.
pub fn is_guarded(
    graph: &ModuleGraph,
    state: &TraversalState,
    target: ModuleId,
    previous: ModuleId,
) -> bool {
    let Some(origin) = origin_line(graph, state, target) else {
        return false;
    };
    let definitions = &graph[target].definitions;

    graph[previous]
        .deferred_imports
        .values()
        .flatten()
        .any(|name| definitions.get(name).is_some_and(|&line| origin > line))
}
