//! Transport-boundary checks for incoming graph payloads.
//!
//! Two conditions are fatal and are detected here, before anything reaches
//! the normalizer:
//!
//! - **Invalid request shape**: the body is not JSON, not an object, or its
//!   `nodes`/`edges` members are present but not arrays.
//! - **Oversized payload**: more raw node or edge records than [`Limits`]
//!   allows.
//!
//! Individual records are kept as untyped [`serde_json::Value`]s; deciding
//! whether a record is usable is the normalizer's job, and a malformed
//! record is never an error at this layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ErrorBody, ErrorCode};

/// Default ceiling on raw node records per request.
pub const DEFAULT_MAX_NODES: usize = 1000;
/// Default ceiling on raw edge records per request.
pub const DEFAULT_MAX_EDGES: usize = 5000;

/// Raw request body: loosely typed node and edge records.
///
/// A missing `nodes` or `edges` member is treated as an empty list. Unknown
/// top-level members (version, metadata, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub edges: Vec<Value>,
}

/// Per-request size ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    #[serde(default = "default_max_edges")]
    pub max_edges: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            max_edges: default_max_edges(),
        }
    }
}

const fn default_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

const fn default_max_edges() -> usize {
    DEFAULT_MAX_EDGES
}

impl Limits {
    /// Reject a payload whose raw record counts exceed the ceiling.
    ///
    /// Counts are taken before filtering: a request with 1001 node records
    /// is rejected even if half of them are malformed.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::TooManyNodes`] or [`RequestError::TooManyEdges`].
    pub const fn check(&self, payload: &RawPayload) -> Result<(), RequestError> {
        if payload.nodes.len() > self.max_nodes {
            return Err(RequestError::TooManyNodes {
                count: payload.nodes.len(),
                max: self.max_nodes,
            });
        }
        if payload.edges.len() > self.max_edges {
            return Err(RequestError::TooManyEdges {
                count: payload.edges.len(),
                max: self.max_edges,
            });
        }
        Ok(())
    }
}

/// Errors raised at the request boundary. None of these reach the engine.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid request shape: {0}")]
    InvalidShape(#[source] serde_json::Error),

    #[error("payload has {count} nodes; the limit is {max}")]
    TooManyNodes { count: usize, max: usize },

    #[error("payload has {count} edges; the limit is {max}")]
    TooManyEdges { count: usize, max: usize },

    /// Raised only in strict mode, when the normalizer dropped dangling edges.
    #[error("{count} edge(s) reference unknown nodes")]
    DanglingReference { count: usize },

    /// Raised only in strict mode, when the normalizer dropped malformed records.
    #[error("{nodes} node record(s) and {edges} edge record(s) are malformed or duplicated")]
    MalformedEntry { nodes: usize, edges: usize },
}

impl RequestError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidShape(_) => ErrorCode::InvalidRequestShape,
            Self::TooManyNodes { .. } | Self::TooManyEdges { .. } => ErrorCode::PayloadTooLarge,
            Self::DanglingReference { .. } => ErrorCode::DanglingReference,
            Self::MalformedEntry { .. } => ErrorCode::MalformedEntry,
        }
    }

    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.error_code(), self.to_string())
    }
}

/// Parse a request body and enforce the size ceiling.
///
/// # Errors
///
/// Returns [`RequestError::InvalidShape`] when the body is not an object with
/// `nodes`/`edges` arrays, or a size error from [`Limits::check`].
pub fn parse_request(body: &[u8], limits: &Limits) -> Result<RawPayload, RequestError> {
    // Going through a map first keeps serde's positional form of the struct
    // (`[[nodes], [edges]]`) from being accepted.
    let members: Map<String, Value> =
        serde_json::from_slice(body).map_err(RequestError::InvalidShape)?;
    let payload =
        RawPayload::deserialize(Value::Object(members)).map_err(RequestError::InvalidShape)?;
    limits.check(&payload)?;
    tracing::trace!(
        nodes = payload.nodes.len(),
        edges = payload.edges.len(),
        "request accepted"
    );
    Ok(payload)
}
