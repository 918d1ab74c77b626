//! The analyzer entry point and its result contract.
//!
//! [`analyze`] runs every structural computation over a normalized
//! [`Graph`] and assembles an [`AnalysisResult`]. It is a pure function of
//! its input: no shared state, no I/O, safe to call from any number of
//! threads at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AnalysisError;
use crate::graph::{
    Adjacency, Graph, NodeId, find_cycles, topological_order, weak_component_count,
};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// In/out degree of a single node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDegree {
    pub in_degree: usize,
    pub out_degree: usize,
}

/// Full structural analysis of one graph.
///
/// `cycles` is present iff the graph is cyclic and `topologically_sorted`
/// iff it is acyclic; absent fields are omitted from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(rename = "isDAG")]
    pub is_dag: bool,
    pub has_cycles: bool,
    pub connected_components: usize,
    /// Keyed by node id, sorted, so serialization is byte-stable.
    pub node_degrees: BTreeMap<NodeId, NodeDegree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<Vec<Vec<NodeId>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topologically_sorted: Option<Vec<NodeId>>,
}

/// Reduced contract for callers that only need the headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(rename = "isDAG")]
    pub is_dag: bool,
    pub has_cycles: bool,
}

impl From<&AnalysisResult> for ParseSummary {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            node_count: result.node_count,
            edge_count: result.edge_count,
            is_dag: result.is_dag,
            has_cycles: result.has_cycles,
        }
    }
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

/// Compute cycles, ordering, degrees and components of `graph`.
///
/// Adjacency is built once and shared by every stage. The topological sort
/// only runs when cycle detection found nothing.
///
/// # Errors
///
/// Returns [`AnalysisError::InconsistentOrdering`] if the topological sort
/// disagrees with cycle detection. That indicates a defect, never bad input.
#[instrument(
    skip_all,
    fields(nodes = graph.node_count(), edges = graph.edge_count(), hash = graph.content_hash())
)]
pub fn analyze(graph: &Graph) -> Result<AnalysisResult, AnalysisError> {
    let adjacency = Adjacency::build(graph);

    let cycles = find_cycles(graph, &adjacency);
    let is_dag = cycles.is_empty();

    let topologically_sorted = if is_dag {
        Some(topological_order(graph, &adjacency)?)
    } else {
        None
    };

    let connected_components = weak_component_count(&adjacency);

    let node_degrees: BTreeMap<NodeId, NodeDegree> = adjacency
        .nodes()
        .map(|idx| {
            (
                graph.node_id(idx).to_string(),
                NodeDegree {
                    in_degree: adjacency.in_degree(idx),
                    out_degree: adjacency.out_degree(idx),
                },
            )
        })
        .collect();

    debug!(
        is_dag,
        cycles = cycles.len(),
        components = connected_components,
        "analysis complete"
    );

    Ok(AnalysisResult {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        is_dag,
        has_cycles: !is_dag,
        connected_components,
        node_degrees,
        cycles: (!is_dag).then_some(cycles),
        topologically_sorted,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
