//! Acyclic dependency graph.
//!
//! Edges point from the dependent item to the item it depends on. Nodes and
//! neighbours live in ordered maps so traversal order never depends on hashing.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use timeline_core::{Dependency, Result, TimelineError};

/// Outcome of offering an edge to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Edge kept
    Added,
    /// Same (dependent, depends_on) pair already present
    Duplicate,
    /// Item depending on itself
    SelfLoop,
    /// Edge would close a cycle and was rolled back
    Cycle,
}

/// Adjacency graph over item names.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph holding the given nodes and no edges.
    pub fn with_nodes<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for node in nodes {
            graph.adjacency.entry(node.into()).or_default();
        }
        graph
    }

    /// Build a graph from a dependency list, keeping every edge.
    pub fn from_dependencies(dependencies: &[Dependency]) -> Self {
        let mut graph = Self::new();
        for dep in dependencies {
            graph.insert(&dep.dependent_item, &dep.depends_on_item);
        }
        graph
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    /// Whether `dependent -> depends_on` is present.
    pub fn contains_edge(&self, dependent: &str, depends_on: &str) -> bool {
        self.adjacency
            .get(dependent)
            .is_some_and(|targets| targets.contains(depends_on))
    }

    /// Insert an edge unconditionally.
    fn insert(&mut self, dependent: &str, depends_on: &str) {
        self.adjacency.entry(depends_on.to_string()).or_default();
        self.adjacency
            .entry(dependent.to_string())
            .or_default()
            .insert(depends_on.to_string());
    }

    fn remove(&mut self, dependent: &str, depends_on: &str) {
        if let Some(targets) = self.adjacency.get_mut(dependent) {
            targets.remove(depends_on);
        }
    }

    /// Tentatively insert an edge and keep it only if the graph stays acyclic.
    pub fn try_add_edge(&mut self, dependent: &str, depends_on: &str) -> Admission {
        if dependent == depends_on {
            return Admission::SelfLoop;
        }
        if self.contains_edge(dependent, depends_on) {
            return Admission::Duplicate;
        }
        self.insert(dependent, depends_on);
        if self.has_cycle() {
            self.remove(dependent, depends_on);
            return Admission::Cycle;
        }
        Admission::Added
    }

    /// Whether any cycle exists.
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Find a cycle using DFS from every unvisited node.
    ///
    /// The returned path repeats its first node at the end.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut recursion_stack: HashSet<&str> = HashSet::new();

        for start in self.adjacency.keys() {
            if !visited.contains(start.as_str()) {
                if let Some(cycle) =
                    self.visit(start, &mut visited, &mut recursion_stack, &mut Vec::new())
                {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        visited: &mut HashSet<&'a str>,
        recursion_stack: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        visited.insert(node);
        recursion_stack.insert(node);
        path.push(node);

        if let Some(targets) = self.adjacency.get(node) {
            for next in targets {
                let next = next.as_str();
                if !visited.contains(next) {
                    if let Some(cycle) = self.visit(next, visited, recursion_stack, path) {
                        return Some(cycle);
                    }
                } else if recursion_stack.contains(next) {
                    let cycle_start = path.iter().position(|n| *n == next).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[cycle_start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(next.to_string());
                    return Some(cycle);
                }
            }
        }

        path.pop();
        recursion_stack.remove(node);
        None
    }
}

/// Whether a dependency list is acyclic.
pub fn validate(dependencies: &[Dependency]) -> bool {
    find_cycle(dependencies).is_none()
}

/// First cycle found in a dependency list, if any.
pub fn find_cycle(dependencies: &[Dependency]) -> Option<Vec<String>> {
    DependencyGraph::from_dependencies(dependencies).find_cycle()
}

/// Like [`validate`], but reports the offending cycle as an error.
pub fn check(dependencies: &[Dependency]) -> Result<()> {
    match find_cycle(dependencies) {
        Some(cycle) => Err(TimelineError::Cycle(cycle)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_core::DependencyType;

    fn dep(dependent: &str, depends_on: &str) -> Dependency {
        Dependency::new(dependent, depends_on, DependencyType::Sequential, 0.5, "test")
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert!(!graph.has_cycle());
        assert!(validate(&[]));
        assert!(check(&[]).is_ok());
    }

    #[test]
    fn test_admission_outcomes() {
        let mut graph = DependencyGraph::with_nodes(["A", "B", "C"]);

        assert_eq!(graph.try_add_edge("B", "A"), Admission::Added);
        assert_eq!(graph.try_add_edge("C", "B"), Admission::Added);
        assert_eq!(graph.try_add_edge("C", "B"), Admission::Duplicate);
        assert_eq!(graph.try_add_edge("A", "A"), Admission::SelfLoop);
        assert_eq!(graph.try_add_edge("A", "C"), Admission::Cycle);

        assert!(!graph.contains_edge("A", "C"));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 3);
        assert!(!graph.has_cycle());
    }

    #[test]
    fn test_rejected_edge_is_rolled_back() {
        let mut graph = DependencyGraph::new();
        graph.try_add_edge("B", "A");
        assert_eq!(graph.try_add_edge("A", "B"), Admission::Cycle);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_find_cycle_path() {
        let deps = vec![dep("A", "B"), dep("B", "C"), dep("C", "A")];
        assert!(!validate(&deps));
        assert_eq!(find_cycle(&deps).unwrap(), vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_check_reports_cycle() {
        let deps = vec![dep("X", "Y"), dep("Y", "X")];
        let err = check(&deps).unwrap_err();
        assert_eq!(err.to_string(), "Dependency cycle: X -> Y -> X");
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let deps = vec![dep("D", "B"), dep("D", "C"), dep("B", "A"), dep("C", "A")];
        assert!(validate(&deps));
    }

    #[test]
    fn test_self_loop_in_list_is_cycle() {
        assert!(!validate(&[dep("A", "A")]));
    }
}
