//! Outgoing adjacency lists and degree counts, built once per analysis.
//!
//! Neighbor lists follow edge insertion order, so a node with edges
//! `e1: a→c` and `e2: a→b` lists `[c, b]`. petgraph's own neighbor
//! iterators walk edges newest-first, which is why the lists are
//! materialized here instead of borrowed from the graph.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::graph::build::Graph;

/// Outgoing neighbors plus in/out degree per node, indexed by `NodeIndex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    outgoing: Vec<Vec<NodeIndex>>,
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
}

impl Adjacency {
    /// Build adjacency and degree tables in O(V + E).
    ///
    /// Every node gets an entry, isolated nodes included. Parallel edges
    /// count once per edge; a self-loop adds one to both degrees of its node.
    ///
    /// # Panics
    ///
    /// Panics if an edge endpoint lies outside the node set, which a
    /// normalized [`Graph`] never allows.
    #[must_use]
    pub fn build(graph: &Graph) -> Self {
        let g = graph.digraph();
        let n = g.node_count();

        let mut outgoing: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        let mut in_degree = vec![0_usize; n];
        let mut out_degree = vec![0_usize; n];

        for edge in g.edge_references() {
            let (source, target) = (edge.source(), edge.target());
            assert!(
                source.index() < n && target.index() < n,
                "edge {} has an endpoint outside the node set",
                edge.weight()
            );
            outgoing[source.index()].push(target);
            out_degree[source.index()] += 1;
            in_degree[target.index()] += 1;
        }

        Self {
            outgoing,
            in_degree,
            out_degree,
        }
    }

    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Outgoing neighbors of `idx` in edge insertion order.
    #[must_use]
    pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.outgoing[idx.index()]
    }

    #[must_use]
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.in_degree[idx.index()]
    }

    #[must_use]
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.out_degree[idx.index()]
    }

    /// In-degree of every node, indexed by `NodeIndex::index()`.
    #[must_use]
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    /// Iterate node indices in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.outgoing.len()).map(NodeIndex::new)
    }
}
