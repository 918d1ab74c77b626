//! Kahn's algorithm, seeded and drained in node insertion order.
//!
//! The queue is FIFO and starts with every zero in-degree node in insertion
//! order; when a node is emitted, its outgoing edges are relaxed in edge
//! insertion order. For a fixed input the order is therefore fully
//! determined.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use tracing::instrument;

use crate::error::AnalysisError;
use crate::graph::adjacency::Adjacency;
use crate::graph::build::{Graph, NodeId};

/// Compute a topological order of an acyclic graph.
///
/// Parallel edges are relaxed once per edge, so a node with two edges from
/// the same predecessor is released only after both.
///
/// # Errors
///
/// Returns [`AnalysisError::InconsistentOrdering`] if fewer nodes were
/// emitted than the graph holds, i.e. the graph was not acyclic. Callers
/// invoke this only after cycle detection reported a DAG, so the error
/// signals a fault rather than bad input.
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn topological_order(
    graph: &Graph,
    adjacency: &Adjacency,
) -> Result<Vec<NodeId>, AnalysisError> {
    let n = adjacency.node_count();
    let mut remaining: Vec<usize> = adjacency.in_degrees().to_vec();

    let mut queue: VecDeque<NodeIndex> = adjacency
        .nodes()
        .filter(|idx| remaining[idx.index()] == 0)
        .collect();

    let mut order: Vec<NodeId> = Vec::with_capacity(n);

    while let Some(idx) = queue.pop_front() {
        order.push(graph.node_id(idx).to_string());
        for &next in adjacency.neighbors(idx) {
            let entry = &mut remaining[next.index()];
            if *entry > 0 {
                *entry -= 1;
                if *entry == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    if order.len() != n {
        return Err(AnalysisError::InconsistentOrdering {
            ordered: order.len(),
            expected: n,
        });
    }

    Ok(order)
}
