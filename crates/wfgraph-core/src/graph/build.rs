//! The normalized workflow graph.
//!
//! # Overview
//!
//! [`Graph`] is the normalizer's output contract: a petgraph directed graph
//! whose node weights are [`NodeId`]s and whose edge weights are [`EdgeId`]s,
//! together with an id → [`NodeIndex`] map.
//!
//! ## Insertion Order
//!
//! Nodes are added in first-occurrence order and edges in input order.
//! Node indices and edge indices therefore follow the caller's payload, and
//! every traversal in [`crate::graph`] that needs a tie-break uses index
//! order. This is what keeps repeated analyses of the same input identical.
//!
//! ## Invariant
//!
//! Every edge endpoint is a node of the graph. A [`Graph`] can only be built
//! by [`crate::graph::normalize`], which filters dangling edges first;
//! [`Graph::from_parts`] asserts the invariant again.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;

/// Opaque node identifier, unique within a graph.
pub type NodeId = String;

/// Opaque edge identifier.
pub type EdgeId = String;

/// A node as far as the engine cares: its identity only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
}

/// A directed edge between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl GraphEdge {
    /// Return `true` if the edge starts and ends at the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A well-formed workflow graph (unique node ids, no dangling edges).
#[derive(Debug, Clone)]
pub struct Graph {
    digraph: DiGraph<NodeId, EdgeId>,
    node_map: HashMap<NodeId, NodeIndex>,
    content_hash: String,
}

impl Graph {
    /// Assemble a graph from already-validated parts.
    ///
    /// `nodes` must have unique ids and every edge endpoint must be one of
    /// them. The normalizer guarantees both.
    ///
    /// # Panics
    ///
    /// Panics if an edge references a node that is not in `nodes`. That is a
    /// contract violation by the caller, not a recoverable condition.
    pub(crate) fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let content_hash = compute_content_hash(&nodes, &edges);

        let mut graph = DiGraph::<NodeId, EdgeId>::with_capacity(nodes.len(), edges.len());
        let mut node_map: HashMap<NodeId, NodeIndex> = HashMap::with_capacity(nodes.len());

        for node in nodes {
            let idx = graph.add_node(node.id.clone());
            let previous = node_map.insert(node.id, idx);
            assert!(previous.is_none(), "duplicate node id reached the graph");
        }

        for edge in edges {
            let (Some(&source), Some(&target)) =
                (node_map.get(&edge.source), node_map.get(&edge.target))
            else {
                panic!(
                    "edge {} references a node outside the normalized set ({} -> {})",
                    edge.id, edge.source, edge.target
                );
            };
            graph.add_edge(source, target, edge.id);
        }

        Self {
            digraph: graph,
            node_map,
            content_hash,
        }
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    /// Return the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    /// Return `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digraph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a node id.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the node id stored at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` does not belong to this graph.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> &str {
        &self.digraph[idx]
    }

    /// Iterate node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.digraph.node_weights().map(String::as_str)
    }

    /// Iterate edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.digraph.edge_references().map(|e| GraphEdge {
            id: e.weight().clone(),
            source: self.digraph[e.source()].clone(),
            target: self.digraph[e.target()].clone(),
        })
    }

    /// Borrow the underlying petgraph graph.
    #[must_use]
    pub const fn digraph(&self) -> &DiGraph<NodeId, EdgeId> {
        &self.digraph
    }

    /// BLAKE3 fingerprint of the node and edge sets (`blake3:<hex>`).
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Hash nodes and edges in insertion order, NUL-separated.
fn compute_content_hash(nodes: &[GraphNode], edges: &[GraphEdge]) -> String {
    let mut hasher = blake3::Hasher::new();
    for node in nodes {
        hasher.update(node.id.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for edge in edges {
        hasher.update(edge.id.as_bytes());
        hasher.update(b"\x00");
        hasher.update(edge.source.as_bytes());
        hasher.update(b"\x00");
        hasher.update(edge.target.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> GraphNode {
        GraphNode { id: id.to_string() }
    }

    fn edge(id: &str, source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn empty_graph() {
        let g = Graph::from_parts(Vec::new(), Vec::new());
        assert!(g.is_empty());
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.content_hash().starts_with("blake3:"));
    }

    #[test]
    fn nodes_keep_insertion_order() {
        let g = Graph::from_parts(vec![node("c"), node("a"), node("b")], Vec::new());
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(g.node_index("c").map(NodeIndex::index), Some(0));
    }

    #[test]
    fn edges_keep_direction_and_order() {
        let g = Graph::from_parts(
            vec![node("a"), node("b")],
            vec![edge("e2", "b", "a"), edge("e1", "a", "b")],
        );
        let edges: Vec<GraphEdge> = g.edges().collect();
        assert_eq!(edges, vec![edge("e2", "b", "a"), edge("e1", "a", "b")]);

        let a = g.node_index("a").expect("a");
        let b = g.node_index("b").expect("b");
        assert!(g.digraph().contains_edge(a, b));
        assert!(g.digraph().contains_edge(b, a));
    }

    #[test]
    fn self_loop_is_allowed() {
        let g = Graph::from_parts(vec![node("a")], vec![edge("e", "a", "a")]);
        assert_eq!(g.edge_count(), 1);
        assert!(g.edges().all(|e| e.is_self_loop()));
    }

    #[test]
    #[should_panic(expected = "outside the normalized set")]
    fn dangling_edge_is_a_contract_violation() {
        let _ = Graph::from_parts(vec![node("a")], vec![edge("e", "a", "ghost")]);
    }

    #[test]
    fn content_hash_changes_with_edges() {
        let without = Graph::from_parts(vec![node("a"), node("b")], Vec::new());
        let with = Graph::from_parts(vec![node("a"), node("b")], vec![edge("e", "a", "b")]);
        assert_ne!(without.content_hash(), with.content_hash());
    }

    #[test]
    fn content_hash_is_stable() {
        let build = || Graph::from_parts(vec![node("a"), node("b")], vec![edge("e", "a", "b")]);
        assert_eq!(build().content_hash(), build().content_hash());
    }
}
