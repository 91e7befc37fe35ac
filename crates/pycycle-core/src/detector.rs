//! Visit-count cycle detection with deferred-import suppression

use crate::context;
use crate::graph::ModuleGraph;
use crate::model::ModuleId;

/// Per-run traversal bookkeeping, indexed by module id.
#[derive(Debug, Clone)]
pub struct TraversalState {
    visits: Vec<u32>,
    parents: Vec<Option<ModuleId>>,
    guarded: Vec<bool>,
}

impl TraversalState {
    pub fn new(module_count: usize) -> Self {
        Self {
            visits: vec![0; module_count],
            parents: vec![None; module_count],
            guarded: vec![false; module_count],
        }
    }

    pub fn visit_count(&self, id: ModuleId) -> u32 {
        self.visits.get(id.index()).copied().unwrap_or(0)
    }

    /// Module that most recently discovered `id`.
    pub fn parent(&self, id: ModuleId) -> Option<ModuleId> {
        self.parents.get(id.index()).copied().flatten()
    }

    pub fn is_guarded(&self, id: ModuleId) -> bool {
        self.guarded.get(id.index()).copied().unwrap_or(false)
    }

    pub(crate) fn set_parent(&mut self, id: ModuleId, parent: ModuleId) {
        self.parents[id.index()] = Some(parent);
    }

    fn mark_guarded(&mut self, id: ModuleId) {
        self.guarded[id.index()] = true;
    }

    fn bump(&mut self, id: ModuleId) {
        self.visits[id.index()] += 1;
    }
}

/// Outcome of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NoCycle,
    /// A load-time cycle was confirmed on a repeated visit of `at`.
    Cycle { at: ModuleId },
}

#[derive(Debug, Clone)]
pub struct Detection {
    pub verdict: Verdict,
    /// Modules whose repeated visit was ignored because the cycle is deferred.
    pub suppressed: Vec<ModuleId>,
    pub state: TraversalState,
}

impl Detection {
    pub fn has_cycle(&self) -> bool {
        matches!(self.verdict, Verdict::Cycle { .. })
    }
}

/// Depth-first walk from `root` driven by an explicit stack.
///
/// A module popped with a visit count above one confirms a cycle unless the
/// context analyzer marked it as guarded. Every edge target is pushed, so all
/// reachable modules are explored; each module expands its edges at most twice.
pub fn detect(graph: &ModuleGraph, root: ModuleId) -> Detection {
    let mut state = TraversalState::new(graph.module_count());
    let mut suppressed = Vec::new();

    if graph.node(root).is_none() {
        return Detection {
            verdict: Verdict::NoCycle,
            suppressed,
            state,
        };
    }

    let mut previous: Option<ModuleId> = None;
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        if state.visit_count(current) > 1 {
            if state.is_guarded(current) {
                if !suppressed.contains(&current) {
                    tracing::debug!("Deferred import cycle through {} ignored", graph[current].name);
                    suppressed.push(current);
                }
                continue;
            }

            tracing::debug!("Import cycle confirmed at {}", graph[current].name);
            return Detection {
                verdict: Verdict::Cycle { at: current },
                suppressed,
                state,
            };
        }

        for edge in &graph[current].outgoing {
            let target = edge.target;
            state.set_parent(target, current);

            if state.visit_count(target) >= 1 {
                if let Some(previous) = previous {
                    if context::is_guarded(graph, &state, target, previous) {
                        state.mark_guarded(target);
                    }
                }
            }

            previous = Some(target);
            stack.push(target);
        }

        state.bump(current);
    }

    Detection {
        verdict: Verdict::NoCycle,
        suppressed,
        state,
    }
}

/// Whether an unguarded import cycle is reachable from `root`.
pub fn has_cycle(graph: &ModuleGraph, root: ModuleId) -> bool {
    detect(graph, root).has_cycle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImportEdge;

    fn chain(names: &[&str], edges: &[(usize, usize)]) -> (ModuleGraph, Vec<ModuleId>) {
        let mut graph = ModuleGraph::new();
        let ids: Vec<_> = names
            .iter()
            .map(|n| graph.get_or_create(format!("/p/{n}.py"), *n))
            .collect();
        graph.set_root_if_unset(ids[0]);
        for &(from, to) in edges {
            graph.add_import(
                ids[from],
                ImportEdge {
                    target: ids[to],
                    line: 1,
                    scope: None,
                },
            );
        }
        (graph, ids)
    }

    #[test]
    fn test_mutual_import_is_cycle() {
        let (graph, ids) = chain(&["a", "b"], &[(0, 1), (1, 0)]);
        let detection = detect(&graph, ids[0]);
        assert_eq!(detection.verdict, Verdict::Cycle { at: ids[0] });
        assert!(detection.suppressed.is_empty());
    }

    #[test]
    fn test_straight_chain_has_no_cycle() {
        let (graph, ids) = chain(&["a", "b", "c"], &[(0, 1), (1, 2)]);
        assert!(!has_cycle(&graph, ids[0]));
    }

    #[test]
    fn test_four_module_ring() {
        let (graph, ids) = chain(&["a", "b", "c", "d"], &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert!(has_cycle(&graph, ids[0]));
    }

    #[test]
    fn test_self_import() {
        let (graph, ids) = chain(&["a"], &[(0, 0)]);
        assert!(has_cycle(&graph, ids[0]));
    }

    #[test]
    fn test_simple_diamond_is_tolerated() {
        let (graph, ids) = chain(&["r", "x", "y", "z"], &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert!(!has_cycle(&graph, ids[0]));
    }

    #[test]
    fn test_unreachable_cycle_is_not_reported() {
        let (graph, ids) = chain(&["a", "b", "c"], &[(1, 2), (2, 1)]);
        assert!(!has_cycle(&graph, ids[0]));
    }

    #[test]
    fn test_unknown_root_is_no_cycle() {
        let (graph, _) = chain(&["a"], &[]);
        assert!(!has_cycle(&graph, ModuleId(42)));
    }

    #[test]
    fn test_visit_counts_are_recorded() {
        let (graph, ids) = chain(&["a", "b"], &[(0, 1)]);
        let detection = detect(&graph, ids[0]);
        assert_eq!(detection.state.visit_count(ids[0]), 1);
        assert_eq!(detection.state.visit_count(ids[1]), 1);
        assert_eq!(detection.state.parent(ids[1]), Some(ids[0]));
        assert_eq!(detection.state.parent(ids[0]), None);
    }
}
