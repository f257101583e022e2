use super::{Dependency, ExternalId};
use std::collections::{BTreeMap, BTreeSet};

/// Directed graph of components keyed by external id. BTree-backed so
/// iteration order is deterministic run-to-run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    components: BTreeMap<ExternalId, Dependency>,
    direct: BTreeSet<ExternalId>,
    relationships: BTreeMap<ExternalId, BTreeSet<ExternalId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_direct(&mut self, dependency: Dependency) {
        self.direct.insert(dependency.external_id.clone());
        self.components
            .insert(dependency.external_id.clone(), dependency);
    }

    pub fn add_child(&mut self, parent: &ExternalId, child: Dependency) {
        self.relationships
            .entry(parent.clone())
            .or_default()
            .insert(child.external_id.clone());
        self.components
            .insert(child.external_id.clone(), child);
    }

    pub fn has_component(&self, id: &ExternalId) -> bool {
        self.components.contains_key(id)
    }

    pub fn component(&self, id: &ExternalId) -> Option<&Dependency> {
        self.components.get(id)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn direct_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.direct.iter().filter_map(|id| self.components.get(id))
    }

    pub fn children_of(&self, parent: &ExternalId) -> Vec<&Dependency> {
        self.relationships
            .get(parent)
            .into_iter()
            .flatten()
            .filter_map(|id| self.components.get(id))
            .collect()
    }

    pub fn components(&self) -> impl Iterator<Item = &Dependency> {
        self.components.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Forge;

    fn dep(name: &str, version: &str) -> Dependency {
        Dependency::new(
            name,
            version,
            ExternalId::name_version(Forge::npmjs(), name, version),
        )
    }

    #[test]
    fn test_direct_and_transitive() {
        let mut graph = DependencyGraph::new();
        let express = dep("express", "4.18.2");
        let express_id = express.external_id.clone();
        graph.add_direct(express);
        graph.add_child(&express_id, dep("accepts", "1.3.8"));

        assert_eq!(graph.component_count(), 2);
        assert_eq!(graph.direct_dependencies().count(), 1);
        let children = graph.children_of(&express_id);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "accepts");
    }

    #[test]
    fn test_duplicate_components_collapse_by_id() {
        let mut graph = DependencyGraph::new();
        graph.add_direct(dep("lodash", "4.17.21"));
        graph.add_direct(dep("lodash", "4.17.21"));

        assert_eq!(graph.component_count(), 1);
    }

    #[test]
    fn test_iteration_is_deterministic() {
        let mut a = DependencyGraph::new();
        let mut b = DependencyGraph::new();
        a.add_direct(dep("zzz", "1.0.0"));
        a.add_direct(dep("aaa", "1.0.0"));
        b.add_direct(dep("aaa", "1.0.0"));
        b.add_direct(dep("zzz", "1.0.0"));

        let names_a: Vec<&str> = a.components().map(|d| d.name.as_str()).collect();
        let names_b: Vec<&str> = b.components().map(|d| d.name.as_str()).collect();
        assert_eq!(names_a, names_b);
        assert_eq!(a, b);
    }
}
