//! Structural cycle listing via strongly connected components
//!
//! Independent of the visit-count verdict: every import edge counts, deferred
//! or not, and every module is considered, reachable from the root or not.

use crate::graph::ModuleGraph;
use crate::model::ModuleId;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

/// Modules that import each other, directly or transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralCycle {
    #[serde(skip)]
    pub modules: Vec<ModuleId>,
    pub names: Vec<String>,
}

impl StructuralCycle {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Members joined for display, e.g. `{a, b, c}`.
    pub fn members(&self) -> String {
        format!("{{{}}}", self.names.join(", "))
    }
}

/// Project the module graph onto a petgraph `DiGraph` whose node indices equal
/// module ids.
fn to_digraph(graph: &ModuleGraph) -> DiGraph<ModuleId, ()> {
    let mut digraph = DiGraph::with_capacity(graph.module_count(), graph.import_count());
    for node in graph.modules() {
        digraph.add_node(node.id);
    }
    for node in graph.modules() {
        for edge in &node.outgoing {
            digraph.update_edge(
                NodeIndex::new(node.id.index()),
                NodeIndex::new(edge.target.index()),
                (),
            );
        }
    }
    digraph
}

/// Whether any import cycle exists anywhere in the graph.
pub fn has_structural_cycle(graph: &ModuleGraph) -> bool {
    is_cyclic_directed(&to_digraph(graph))
}

/// All strongly connected components with more than one module, plus
/// self-importing modules. Members and components are ordered by module id.
pub fn structural_cycles(graph: &ModuleGraph) -> Vec<StructuralCycle> {
    let digraph = to_digraph(graph);
    let mut cycles: Vec<StructuralCycle> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&idx| digraph.contains_edge(idx, idx))
        })
        .map(|component| {
            let mut modules: Vec<ModuleId> = component.iter().map(|&idx| digraph[idx]).collect();
            modules.sort();
            let names = modules.iter().map(|&id| graph[id].name.clone()).collect();
            StructuralCycle { modules, names }
        })
        .collect();

    cycles.sort_by_key(|cycle| cycle.modules.first().copied());
    tracing::debug!("Found {} structural import cycle(s)", cycles.len());
    cycles
}
