// src/dag/graph.rs

use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Identifier of a stack: its cleaned, absolute directory path.
pub type NodeId = String;

/// A dependency constraint: `source` must finish before `target` starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// The same constraint read the other way round.
    pub fn reversed(&self) -> Edge {
        Edge {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Deduplicated set of dependency edges.
///
/// Nodes only exist as edge endpoints; a stack that nobody depends on and
/// that depends on nothing never shows up here. Edges keep their insertion
/// order so that rendered output looks stable, but nothing in the ordering
/// or execution logic relies on it.
#[derive(Debug, Clone, Default)]
pub struct DagGraph {
    edges: Vec<Edge>,
    index: HashSet<Edge>,
}

impl DagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.insert(edge);
        }
        graph
    }

    /// Add `source -> target`. Returns `false` if the edge was already known.
    pub fn add_edge(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> bool {
        self.insert(Edge::new(source, target))
    }

    fn insert(&mut self, edge: Edge) -> bool {
        if self.index.contains(&edge) {
            return false;
        }
        self.index.insert(edge.clone());
        self.edges.push(edge);
        true
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All nodes touched by at least one edge.
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.index.contains(&Edge::new(source, target))
    }

    /// New graph with every edge flipped. `self` is left untouched.
    pub fn reversed(&self) -> DagGraph {
        DagGraph::from_edges(self.edges.iter().map(Edge::reversed))
    }

    /// Direct dependencies of `node` (sources of edges pointing at it).
    pub fn dependencies_of(&self, node: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.target == node)
            .map(|e| e.source.as_str())
            .collect()
    }

    /// Direct dependents of `node` (targets of edges leaving it).
    pub fn dependents_of(&self, node: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.source == node)
            .map(|e| e.target.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_edges_collapse() {
        let mut g = DagGraph::new();
        assert!(g.add_edge("/tf/vpc", "/tf/eks"));
        assert!(!g.add_edge("/tf/vpc", "/tf/eks"));
        assert_eq!(g.edges().len(), 1);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn nodes_are_union_of_endpoints() {
        let g = DagGraph::from_edges([
            Edge::new("zones", "vpc1"),
            Edge::new("zones", "vpc2"),
            Edge::new("vpc1", "eks1"),
        ]);
        let nodes: Vec<&str> = g.nodes().into_iter().collect();
        assert_eq!(nodes, vec!["eks1", "vpc1", "vpc2", "zones"]);
    }

    #[test]
    fn reversal_is_pure_and_swaps_every_edge() {
        let g = DagGraph::from_edges([Edge::new("a", "b"), Edge::new("b", "c")]);
        let r = g.reversed();

        assert!(r.contains_edge("b", "a"));
        assert!(r.contains_edge("c", "b"));
        assert!(!r.contains_edge("a", "b"));
        // input graph untouched
        assert!(g.contains_edge("a", "b"));
        assert_eq!(r.reversed().edges(), g.edges());
    }

    #[test]
    fn adjacency_helpers() {
        let g = DagGraph::from_edges([
            Edge::new("a", "c"),
            Edge::new("b", "c"),
            Edge::new("c", "d"),
        ]);
        assert_eq!(g.dependencies_of("c"), vec!["a", "b"]);
        assert_eq!(g.dependents_of("c"), vec!["d"]);
        assert!(g.dependencies_of("a").is_empty());
    }
}
