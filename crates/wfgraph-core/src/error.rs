use std::fmt;

use serde::Serialize;

/// Machine-readable error codes surfaced at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidRequestShape,
    PayloadTooLarge,
    InputUnreadable,
    DanglingReference,
    MalformedEntry,
    ConfigParseError,
    InternalInconsistency,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidRequestShape => "E1001",
            Self::PayloadTooLarge => "E1002",
            Self::InputUnreadable => "E1003",
            Self::DanglingReference => "E2001",
            Self::MalformedEntry => "E2002",
            Self::ConfigParseError => "E3001",
            Self::InternalInconsistency => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidRequestShape => "Request is not an object with nodes/edges arrays",
            Self::PayloadTooLarge => "Payload exceeds the node/edge ceiling",
            Self::InputUnreadable => "Input could not be read",
            Self::DanglingReference => "Edge references an unknown node",
            Self::MalformedEntry => "Node or edge record is missing required fields",
            Self::ConfigParseError => "Config file parse error",
            Self::InternalInconsistency => "Internal consistency fault",
        }
    }

    /// Optional remediation hint for operators and calling services.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidRequestShape => {
                Some("Send a JSON object of the form {\"nodes\": [...], \"edges\": [...]}.")
            }
            Self::PayloadTooLarge => Some("Split the workflow or raise the configured limits."),
            Self::InputUnreadable => {
                Some("Check the file path and permissions, or pipe the payload on stdin.")
            }
            Self::DanglingReference => {
                Some("Remove the edge or add the missing node, or drop --strict.")
            }
            Self::MalformedEntry => {
                Some("Every node needs a non-empty id; every edge needs id, source and target.")
            }
            Self::ConfigParseError => Some("Fix syntax in the wfgraph config.toml and retry."),
            Self::InternalInconsistency => {
                Some("This is a bug in the analyzer. Report it with the offending payload.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structured `{code, message}` error object returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl ErrorBody {
    /// Build a body from a code and a specific message.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            hint: code.hint(),
        }
    }
}

/// Classify an error chain coming out of the pipeline or config loading.
///
/// Typed boundary and engine errors keep their own codes. A TOML error
/// anywhere in the chain is a config parse error; any other I/O failure
/// means the input could not be read.
impl From<&anyhow::Error> for ErrorBody {
    fn from(err: &anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<crate::payload::RequestError>() {
            return e.to_body();
        }
        if let Some(e) = err.downcast_ref::<AnalysisError>() {
            return e.to_body();
        }
        let code = if err.chain().any(<dyn std::error::Error>::is::<toml::de::Error>) {
            ErrorCode::ConfigParseError
        } else if err.chain().any(<dyn std::error::Error>::is::<std::io::Error>) {
            ErrorCode::InputUnreadable
        } else {
            ErrorCode::InternalInconsistency
        };
        Self::new(code, format!("{err:#}"))
    }
}

/// Fatal engine fault: the analyzer produced something it must never produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Kahn's algorithm ordered fewer nodes than the graph holds even though
    /// cycle detection reported the graph as acyclic.
    #[error(
        "topological ordering covered {ordered} of {expected} nodes after cycle detection reported a DAG"
    )]
    InconsistentOrdering { ordered: usize, expected: usize },
}

impl AnalysisError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InconsistentOrdering { .. } => ErrorCode::InternalInconsistency,
        }
    }

    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.error_code(), self.to_string())
    }
}
