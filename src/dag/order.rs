// src/dag/order.rs

//! Topological ordering of a [`DagGraph`] (Kahn's algorithm).
//!
//! Reversal is applied to the edges *before* in-degrees are computed, so a
//! reverse order is a genuine teardown order and not the forward list read
//! backwards.
//!
//! Ties between simultaneously ready nodes are broken lexically on the first
//! wave and by edge insertion order afterwards. The result is therefore the
//! same on every run for the same input.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::dag::graph::{DagGraph, NodeId};
use crate::errors::{Result, TfOrderError};
use crate::types::Direction;

struct KahnIndex<'a> {
    adjacency: BTreeMap<&'a str, Vec<&'a str>>,
    in_degree: BTreeMap<&'a str, usize>,
}

impl<'a> KahnIndex<'a> {
    fn build(graph: &'a DagGraph, direction: Direction) -> Self {
        let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();

        for edge in graph.edges() {
            let (from, to) = match direction {
                Direction::Forward => (edge.source.as_str(), edge.target.as_str()),
                Direction::Reverse => (edge.target.as_str(), edge.source.as_str()),
            };
            adjacency.entry(from).or_default().push(to);
            in_degree.entry(from).or_insert(0);
            *in_degree.entry(to).or_insert(0) += 1;
        }

        Self {
            adjacency,
            in_degree,
        }
    }

    fn roots(&self) -> Vec<&'a str> {
        self.in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(node, _)| *node)
            .collect()
    }

    /// Decrement the in-degree of everything `node` points at and return the
    /// nodes that just became ready.
    fn release(&mut self, node: &str) -> Vec<&'a str> {
        let mut ready = Vec::new();
        if let Some(targets) = self.adjacency.get(node) {
            for &target in targets {
                if let Some(deg) = self.in_degree.get_mut(target) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push(target);
                    }
                }
            }
        }
        ready
    }
}

/// Compute a total order consistent with every edge of `graph`.
///
/// Every edge's source precedes its target (or follows it, for
/// [`Direction::Reverse`]). A cycle is a fatal [`TfOrderError::DagCycle`];
/// no partial order is returned.
pub fn topo_order(graph: &DagGraph, direction: Direction) -> Result<Vec<NodeId>> {
    let mut index = KahnIndex::build(graph, direction);
    let total = index.in_degree.len();

    let mut queue: VecDeque<&str> = index.roots().into_iter().collect();
    let mut order: Vec<NodeId> = Vec::with_capacity(total);

    while let Some(node) = queue.pop_front() {
        order.push(node.to_string());
        queue.extend(index.release(node));
    }

    if order.len() < total {
        return Err(cycle_error(graph, &order));
    }

    debug!(nodes = total, ?direction, "computed topological order");
    Ok(order)
}

/// Group nodes into waves: every node of wave `k` only depends on nodes in
/// waves `< k`, so all nodes of one wave may run concurrently.
pub fn waves(graph: &DagGraph, direction: Direction) -> Result<Vec<Vec<NodeId>>> {
    let mut index = KahnIndex::build(graph, direction);
    let total = index.in_degree.len();

    let mut current: Vec<&str> = index.roots();
    let mut waves: Vec<Vec<NodeId>> = Vec::new();
    let mut seen: Vec<NodeId> = Vec::with_capacity(total);

    while !current.is_empty() {
        let mut next = Vec::new();
        for node in &current {
            next.extend(index.release(node));
        }
        next.sort_unstable();

        let wave: Vec<NodeId> = current.iter().map(|n| n.to_string()).collect();
        seen.extend(wave.iter().cloned());
        waves.push(wave);
        current = next;
    }

    if seen.len() < total {
        return Err(cycle_error(graph, &seen));
    }

    Ok(waves)
}

/// Build a cycle error naming the nodes that actually sit on a cycle.
///
/// Nodes left over by Kahn's algorithm are either on a cycle or downstream
/// of one; strongly connected components of the leftover subgraph separate
/// the two.
fn cycle_error(graph: &DagGraph, visited: &[NodeId]) -> TfOrderError {
    let visited: BTreeSet<&str> = visited.iter().map(|s| s.as_str()).collect();

    let mut rest: DiGraphMap<&str, ()> = DiGraphMap::new();
    for edge in graph.edges() {
        let (s, t) = (edge.source.as_str(), edge.target.as_str());
        if !visited.contains(s) && !visited.contains(t) {
            rest.add_edge(s, t, ());
        }
    }

    let mut nodes: Vec<NodeId> = tarjan_scc(&rest)
        .into_iter()
        .filter(|scc| scc.len() > 1 || rest.contains_edge(scc[0], scc[0]))
        .flatten()
        .map(str::to_string)
        .collect();

    if nodes.is_empty() {
        nodes = rest.nodes().map(str::to_string).collect();
    }
    nodes.sort();

    warn!(?nodes, "cycle detected in dependency graph");
    TfOrderError::DagCycle { nodes }
}
