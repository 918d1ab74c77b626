//! Payload normalization: raw records in, well-formed [`Graph`] out.
//!
//! # Rules
//!
//! - A node record is kept iff it is a JSON object whose `id` is a non-empty
//!   string. Every other field is opaque and ignored.
//! - Duplicate node ids: **first occurrence wins**. Later records with the
//!   same id are dropped; the node keeps the position of its first valid
//!   occurrence.
//! - An edge record is kept iff it is a JSON object whose `id`, `source` and
//!   `target` are non-empty strings and both endpoints are kept nodes.
//!   Self-loops are kept.
//! - Edge ids are not deduplicated; parallel edges count separately.
//!
//! Nothing here returns an error. Dropped records are tallied in a
//! [`NormalizeReport`], which strict callers can turn into a boundary error
//! with [`NormalizeReport::strict_check`].

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::graph::build::{Graph, GraphEdge, GraphNode};
use crate::payload::{RawPayload, RequestError};

// ---------------------------------------------------------------------------
// NormalizeReport
// ---------------------------------------------------------------------------

/// Tally of the records the normalizer dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    /// Node records without a usable id.
    pub invalid_nodes: usize,
    /// Node records whose id was already taken.
    pub duplicate_nodes: usize,
    /// Edge records missing `id`, `source` or `target`.
    pub invalid_edges: usize,
    /// Well-formed edge records with an endpoint outside the node set.
    pub dangling_edges: usize,
}

impl NormalizeReport {
    /// Return `true` if no record was dropped.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.invalid_nodes == 0
            && self.duplicate_nodes == 0
            && self.invalid_edges == 0
            && self.dangling_edges == 0
    }

    /// Total number of dropped records.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.invalid_nodes + self.duplicate_nodes + self.invalid_edges + self.dangling_edges
    }

    /// Reject the payload if anything was dropped.
    ///
    /// Malformed records take precedence over dangling references in the
    /// reported error, since an edge may dangle only because its endpoint
    /// record was malformed.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedEntry`] or
    /// [`RequestError::DanglingReference`].
    pub const fn strict_check(&self) -> Result<(), RequestError> {
        let malformed_nodes = self.invalid_nodes + self.duplicate_nodes;
        if malformed_nodes > 0 || self.invalid_edges > 0 {
            return Err(RequestError::MalformedEntry {
                nodes: malformed_nodes,
                edges: self.invalid_edges,
            });
        }
        if self.dangling_edges > 0 {
            return Err(RequestError::DanglingReference {
                count: self.dangling_edges,
            });
        }
        Ok(())
    }
}

/// Normalizer output: the graph plus what was filtered to get it.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub graph: Graph,
    pub report: NormalizeReport,
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Filter a raw payload into a well-formed [`Graph`].
#[must_use]
#[instrument(skip_all, fields(raw_nodes = payload.nodes.len(), raw_edges = payload.edges.len()))]
pub fn normalize(payload: &RawPayload) -> Normalized {
    let mut report = NormalizeReport::default();

    let mut seen: HashSet<&str> = HashSet::with_capacity(payload.nodes.len());
    let mut nodes: Vec<GraphNode> = Vec::with_capacity(payload.nodes.len());

    for record in &payload.nodes {
        let Some(id) = non_empty_str(record, "id") else {
            report.invalid_nodes += 1;
            continue;
        };
        if seen.insert(id) {
            nodes.push(GraphNode { id: id.to_string() });
        } else {
            report.duplicate_nodes += 1;
        }
    }

    let mut edges: Vec<GraphEdge> = Vec::with_capacity(payload.edges.len());

    for record in &payload.edges {
        let (Some(id), Some(source), Some(target)) = (
            non_empty_str(record, "id"),
            non_empty_str(record, "source"),
            non_empty_str(record, "target"),
        ) else {
            report.invalid_edges += 1;
            continue;
        };
        if !seen.contains(source) || !seen.contains(target) {
            report.dangling_edges += 1;
            continue;
        }
        edges.push(GraphEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        invalid_nodes = report.invalid_nodes,
        duplicate_nodes = report.duplicate_nodes,
        invalid_edges = report.invalid_edges,
        dangling_edges = report.dangling_edges,
        "payload normalized"
    );

    Normalized {
        graph: Graph::from_parts(nodes, edges),
        report,
    }
}

/// Read `record[field]` as a non-empty string.
fn non_empty_str<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record
        .as_object()?
        .get(field)?
        .as_str()
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(nodes: Value, edges: Value) -> RawPayload {
        serde_json::from_value(json!({ "nodes": nodes, "edges": edges })).expect("payload")
    }

    fn ids(graph: &Graph) -> Vec<&str> {
        graph.node_ids().collect()
    }

    #[test]
    fn empty_payload_yields_empty_graph() {
        let out = normalize(&RawPayload::default());
        assert!(out.graph.is_empty());
        assert_eq!(out.graph.edge_count(), 0);
        assert!(out.report.is_clean());
    }

    #[test]
    fn opaque_fields_are_ignored() {
        let p = payload(
            json!([
                {"id": "1", "type": "input", "position": {"x": 0, "y": 0}, "data": {"label": "In"}},
                {"id": "2", "data": {"label": "Out"}}
            ]),
            json!([{"id": "e1", "source": "1", "target": "2", "animated": true, "sourceHandle": "h"}]),
        );
        let out = normalize(&p);
        assert_eq!(ids(&out.graph), vec!["1", "2"]);
        assert_eq!(out.graph.edge_count(), 1);
        assert!(out.report.is_clean());
    }

    #[test]
    fn invalid_nodes_dropped_silently() {
        let p = payload(
            json!([null, 7, "a", {}, {"id": ""}, {"id": 5}, {"id": null}, {"id": "ok"}]),
            json!([]),
        );
        let out = normalize(&p);
        assert_eq!(ids(&out.graph), vec!["ok"]);
        assert_eq!(out.report.invalid_nodes, 7);
    }

    #[test]
    fn duplicate_node_first_occurrence_wins() {
        let p = payload(
            json!([{"id": "b"}, {"id": "a"}, {"id": "b", "data": {"label": "second"}}]),
            json!([]),
        );
        let out = normalize(&p);
        assert_eq!(ids(&out.graph), vec!["b", "a"]);
        assert_eq!(out.report.duplicate_nodes, 1);
    }

    #[test]
    fn edge_missing_fields_dropped() {
        let p = payload(
            json!([{"id": "a"}, {"id": "b"}]),
            json!([
                {"source": "a", "target": "b"},
                {"id": "", "source": "a", "target": "b"},
                {"id": "e", "target": "b"},
                {"id": "e", "source": "a"},
                {"id": "e", "source": "a", "target": ""},
                null
            ]),
        );
        let out = normalize(&p);
        assert_eq!(out.graph.edge_count(), 0);
        assert_eq!(out.report.invalid_edges, 6);
        assert_eq!(out.report.dangling_edges, 0);
    }

    #[test]
    fn dangling_edges_dropped() {
        let p = payload(
            json!([{"id": "a"}, {"id": "b"}]),
            json!([
                {"id": "e1", "source": "a", "target": "b"},
                {"id": "e2", "source": "a", "target": "ghost"},
                {"id": "e3", "source": "ghost", "target": "b"}
            ]),
        );
        let out = normalize(&p);
        assert_eq!(out.graph.edge_count(), 1);
        assert_eq!(out.report.dangling_edges, 2);
    }

    #[test]
    fn edge_to_invalid_node_counts_as_dangling() {
        let p = payload(
            json!([{"id": "a"}, {"id": ""}]),
            json!([{"id": "e", "source": "a", "target": ""}, {"id": "f", "source": "a", "target": "b"}]),
        );
        let out = normalize(&p);
        assert_eq!(out.graph.edge_count(), 0);
        assert_eq!(out.report.invalid_edges, 1);
        assert_eq!(out.report.dangling_edges, 1);
    }

    #[test]
    fn self_loops_and_parallel_edges_kept() {
        let p = payload(
            json!([{"id": "a"}, {"id": "b"}]),
            json!([
                {"id": "loop", "source": "a", "target": "a"},
                {"id": "e", "source": "a", "target": "b"},
                {"id": "e", "source": "a", "target": "b"}
            ]),
        );
        let out = normalize(&p);
        assert_eq!(out.graph.edge_count(), 3);
        assert!(out.report.is_clean());
    }

    #[test]
    fn edge_order_follows_payload() {
        let p = payload(
            json!([{"id": "a"}, {"id": "b"}, {"id": "c"}]),
            json!([
                {"id": "e2", "source": "b", "target": "c"},
                {"id": "e1", "source": "a", "target": "b"}
            ]),
        );
        let out = normalize(&p);
        let edge_ids: Vec<String> = out.graph.edges().map(|e| e.id).collect();
        assert_eq!(edge_ids, vec!["e2", "e1"]);
    }

    #[test]
    fn report_totals() {
        let report = NormalizeReport {
            invalid_nodes: 1,
            duplicate_nodes: 2,
            invalid_edges: 3,
            dangling_edges: 4,
        };
        assert_eq!(report.dropped(), 10);
        assert!(!report.is_clean());
    }

    #[test]
    fn strict_check_clean_report_passes() {
        assert!(NormalizeReport::default().strict_check().is_ok());
    }

    #[test]
    fn strict_check_reports_dangling() {
        let report = NormalizeReport {
            dangling_edges: 2,
            ..NormalizeReport::default()
        };
        let err = report.strict_check().expect_err("dangling");
        assert!(matches!(err, RequestError::DanglingReference { count: 2 }));
    }

    #[test]
    fn strict_check_prefers_malformed() {
        let report = NormalizeReport {
            duplicate_nodes: 1,
            dangling_edges: 2,
            ..NormalizeReport::default()
        };
        let err = report.strict_check().expect_err("malformed");
        assert!(matches!(err, RequestError::MalformedEntry { nodes: 1, edges: 0 }));
    }
}
