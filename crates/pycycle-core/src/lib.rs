//! Module graph, import resolution and cycle analysis for pycycle

pub mod model;
pub mod graph;
pub mod events;
pub mod resolver;
pub mod builder;
pub mod detector;
pub mod context;
pub mod path;
pub mod scc;


#[cfg(test)]
pub mod test_utils;

pub use model::{ModuleId, ModuleNode, ImportEdge};
pub use graph::ModuleGraph;
pub use events::{ImportEvent, DefinitionEvent, ParsedModule};
pub use resolver::{ModuleResolver, SourceResolver, SOURCE_EXTENSION, resolve};
pub use builder::{GraphBuilder, BuildOutput, ParseFailure};
pub use detector::{Detection, TraversalState, Verdict, detect, has_cycle};
pub use path::{CycleHop, CyclePath, extract_cycle_path};
pub use scc::{StructuralCycle, structural_cycles, has_structural_cycle};
