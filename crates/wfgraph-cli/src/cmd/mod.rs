pub mod analyze;
pub mod completions;
pub mod parse;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use wfgraph_core::graph::{NormalizeReport, normalize};
use wfgraph_core::{AnalysisResult, Limits, analyze, parse_request};

/// Input selection shared by `wfg analyze` and `wfg parse`.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Payload file; `-` or omitted reads stdin.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Effective pipeline settings after config file and flag overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub limits: Limits,
    pub strict: bool,
}

/// Pipeline output: the analysis plus what normalization dropped.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub result: AnalysisResult,
    pub report: NormalizeReport,
}

/// Read the request body from a file or stdin.
pub fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) if path != Path::new("-") => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut body = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut body)
                .context("Failed to read payload from stdin")?;
            Ok(body)
        }
    }
}

/// Boundary checks, normalization, optional strict rejection, analysis.
pub fn run_pipeline(body: &[u8], settings: &Settings) -> Result<Analyzed> {
    let payload = parse_request(body, &settings.limits)?;
    let normalized = normalize(&payload);

    if settings.strict {
        normalized.report.strict_check()?;
    }

    let result = analyze(&normalized.graph)?;
    info!(
        nodes = result.node_count,
        edges = result.edge_count,
        is_dag = result.is_dag,
        "graph analyzed"
    );

    Ok(Analyzed {
        result,
        report: normalized.report,
    })
}
