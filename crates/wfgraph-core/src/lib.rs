#![forbid(unsafe_code)]
//! wfgraph-core library: validation and structural analysis of workflow
//! graphs.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the request boundary and in the engine,
//!   each mapped to a stable [`error::ErrorCode`]; `anyhow::Result` for config
//!   loading.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`). The library never
//!   installs a subscriber.
//!
//! # Pipeline
//!
//! ```rust,ignore
//! use wfgraph_core::{analyze, graph::normalize, payload::{parse_request, Limits}};
//!
//! let payload = parse_request(body, &Limits::default())?;
//! let normalized = normalize(&payload);
//! let result = analyze(&normalized.graph)?;
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod payload;

pub use analysis::{AnalysisResult, NodeDegree, ParseSummary, analyze};
pub use error::{AnalysisError, ErrorBody, ErrorCode};
pub use payload::{Limits, RawPayload, RequestError, parse_request};
