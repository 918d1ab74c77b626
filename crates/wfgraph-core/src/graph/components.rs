//! Weakly connected components: edge direction ignored.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;

use crate::graph::adjacency::Adjacency;

/// Count weakly connected components with a breadth-first search over the
/// undirected view of the graph.
///
/// Isolated nodes are components of size one. An empty graph has zero
/// components.
#[must_use]
pub fn weak_component_count(adjacency: &Adjacency) -> usize {
    let n = adjacency.node_count();

    let mut undirected: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    for node in adjacency.nodes() {
        for &next in adjacency.neighbors(node) {
            undirected[node.index()].push(next);
            undirected[next.index()].push(node);
        }
    }

    let mut seen = FixedBitSet::with_capacity(n);
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    let mut components = 0;

    for start in adjacency.nodes() {
        if seen.put(start.index()) {
            continue;
        }
        components += 1;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for &next in &undirected[node.index()] {
                if !seen.put(next.index()) {
                    queue.push_back(next);
                }
            }
        }
    }

    components
}
