//! Cycle detection by depth-first search over the outgoing adjacency.
//!
//! # Overview
//!
//! Roots are tried in node insertion order; any node not yet visited starts
//! a new search. Within a search, neighbors are explored in edge insertion
//! order. An edge whose target is still on the current DFS path closes a
//! cycle, recorded as the path from that target down to the current node,
//! followed by the target again:
//!
//! ```text
//! path: A → B → C,  edge C → A  ⇒  cycle [A, B, C, A]
//! path: A,          edge A → A  ⇒  cycle [A, A]
//! ```
//!
//! The search keeps going after a cycle is found, so every back edge the
//! traversal meets is reported. This is not an enumeration of all
//! elementary cycles: a cycle reachable only through an already-visited
//! node is not reported again, but every cyclic graph yields at least one
//! cycle.
//!
//! The DFS is iterative with an explicit frame stack, so chains of any
//! depth are safe.

use std::convert::Infallible;
use std::ops::ControlFlow;

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::graph::adjacency::Adjacency;
use crate::graph::build::{Graph, NodeId};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Return every cycle closed by a back edge of the insertion-ordered DFS.
///
/// Each cycle starts and ends with the same node id. The list is empty iff
/// the graph is acyclic.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn find_cycles(graph: &Graph, adjacency: &Adjacency) -> Vec<Vec<NodeId>> {
    let mut cycles: Vec<Vec<NodeId>> = Vec::new();

    let ControlFlow::Continue(()) = walk_back_edges::<Infallible>(adjacency, |path, closing| {
        let mut cycle: Vec<NodeId> = path
            .iter()
            .map(|&idx| graph.node_id(idx).to_string())
            .collect();
        cycle.push(graph.node_id(closing).to_string());
        cycles.push(cycle);
        ControlFlow::Continue(())
    });

    debug!(cycles = cycles.len(), "cycle detection complete");
    cycles
}

/// Return `true` if the graph contains at least one directed cycle.
///
/// Stops at the first back edge.
#[must_use]
pub fn has_cycles(graph: &Graph) -> bool {
    let adjacency = Adjacency::build(graph);
    walk_back_edges(&adjacency, |_, _| ControlFlow::Break(())).is_break()
}

/// Return `true` if the graph is a directed acyclic graph.
#[must_use]
pub fn is_dag(graph: &Graph) -> bool {
    !has_cycles(graph)
}

// ---------------------------------------------------------------------------
// DFS
// ---------------------------------------------------------------------------

/// One level of the explicit DFS stack.
struct Frame {
    node: NodeIndex,
    /// Position of the next neighbor to explore in `adjacency.neighbors(node)`.
    cursor: usize,
}

/// Walk the graph depth-first and call `on_back_edge` for every edge whose
/// target is on the current path.
///
/// The callback receives the path slice starting at the closing node and
/// ending at the current node, plus the closing node itself.
fn walk_back_edges<B>(
    adjacency: &Adjacency,
    mut on_back_edge: impl FnMut(&[NodeIndex], NodeIndex) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let n = adjacency.node_count();
    let mut visited = FixedBitSet::with_capacity(n);
    // Position of each node on the current path, `None` when off-path.
    let mut path_pos: Vec<Option<usize>> = vec![None; n];
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for root in adjacency.nodes() {
        if visited.contains(root.index()) {
            continue;
        }

        visited.insert(root.index());
        path_pos[root.index()] = Some(path.len());
        path.push(root);
        stack.push(Frame {
            node: root,
            cursor: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let current = frame.node;
            let next = adjacency.neighbors(current).get(frame.cursor).copied();
            frame.cursor += 1;

            let Some(neighbor) = next else {
                stack.pop();
                path.pop();
                path_pos[current.index()] = None;
                continue;
            };

            if let Some(start) = path_pos[neighbor.index()] {
                on_back_edge(&path[start..], neighbor)?;
            } else if !visited.contains(neighbor.index()) {
                visited.insert(neighbor.index());
                path_pos[neighbor.index()] = Some(path.len());
                path.push(neighbor);
                stack.push(Frame {
                    node: neighbor,
                    cursor: 0,
                });
            }
        }
    }

    ControlFlow::Continue(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
