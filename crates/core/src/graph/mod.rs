//! Dependency graph model: forge-qualified external ids, components, and the
//! directed graph each detector extracts.

mod dependency;
mod dependency_graph;
mod external_id;

pub use dependency::Dependency;
pub use dependency_graph::DependencyGraph;
pub use external_id::{ExternalId, Forge};
