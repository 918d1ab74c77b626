//! Workflow graph construction and structural analysis.
//!
//! # Overview
//!
//! This module turns a loosely typed payload into a petgraph-based directed
//! graph and computes the structural properties the editor needs: cycles,
//! a topological order, node degrees and weak component count.
//!
//! ## Pipeline
//!
//! ```text
//! RawPayload (untyped node/edge records)
//!        ↓  normalize::normalize()
//! Graph (unique node ids, no dangling edges)  +  NormalizeReport
//!        ↓  adjacency::Adjacency::build()
//! Adjacency (edge-ordered neighbor lists, in/out degrees)
//!        ├─ cycles::find_cycles()
//!        ├─ topo::topological_order()        (only when acyclic)
//!        └─ components::weak_component_count()
//!        ↓
//! crate::analysis::AnalysisResult
//! ```
//!
//! ## Determinism
//!
//! Node indices follow first-occurrence order and edge indices follow input
//! order. Every traversal breaks ties by index, so analyzing the same
//! payload twice gives identical cycles and orderings.
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use wfgraph_core::graph::{normalize, Adjacency, find_cycles};
//!
//! let normalized = normalize(&payload);
//! let adjacency = Adjacency::build(&normalized.graph);
//! let cycles = find_cycles(&normalized.graph, &adjacency);
//! ```

pub mod adjacency;
pub mod build;
pub mod components;
pub mod cycles;
pub mod normalize;
pub mod topo;

pub use adjacency::Adjacency;
pub use build::{EdgeId, Graph, GraphEdge, GraphNode, NodeId};
pub use components::weak_component_count;
pub use cycles::{find_cycles, has_cycles, is_dag};
pub use normalize::{NormalizeReport, Normalized, normalize};
pub use topo::topological_order;
