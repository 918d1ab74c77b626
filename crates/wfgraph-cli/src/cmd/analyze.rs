//! `wfg analyze`: full structural analysis of a workflow graph.

use std::io::Write;

use clap::Args;
use wfgraph_core::AnalysisResult;

use super::{InputArgs, Settings, read_input, run_pipeline};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `wfg analyze`.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute `wfg analyze`.
pub fn run_analyze(args: &AnalyzeArgs, settings: &Settings, output: OutputMode) -> anyhow::Result<()> {
    let body = read_input(args.input.file.as_deref())?;
    let analyzed = run_pipeline(&body, settings)?;
    let dropped = analyzed.report.dropped();

    render_mode(
        output,
        &analyzed.result,
        render_analysis_text,
        |result, w| render_analysis_pretty(result, dropped, w),
    )
}

fn join(ids: &[String]) -> String {
    ids.join(" ")
}

fn render_analysis_text(result: &AnalysisResult, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "nodes={} edges={} dag={} components={}",
        result.node_count, result.edge_count, result.is_dag, result.connected_components
    )?;
    if let Some(order) = &result.topologically_sorted {
        writeln!(w, "order {}", join(order))?;
    }
    for cycle in result.cycles.iter().flatten() {
        writeln!(w, "cycle {}", join(cycle))?;
    }
    for (id, degree) in &result.node_degrees {
        writeln!(w, "degree {id} in={} out={}", degree.in_degree, degree.out_degree)?;
    }
    Ok(())
}

fn render_analysis_pretty(
    result: &AnalysisResult,
    dropped: usize,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    pretty_section(w, "Workflow graph")?;
    pretty_kv(w, "Nodes", result.node_count.to_string())?;
    pretty_kv(w, "Edges", result.edge_count.to_string())?;
    pretty_kv(w, "Components", result.connected_components.to_string())?;
    pretty_kv(w, "Acyclic", if result.is_dag { "yes" } else { "no" })?;
    if dropped > 0 {
        pretty_kv(w, "Dropped", format!("{dropped} malformed or dangling record(s)"))?;
    }

    if let Some(order) = &result.topologically_sorted {
        writeln!(w)?;
        pretty_section(w, "Execution order")?;
        for (pos, id) in order.iter().enumerate() {
            writeln!(w, "  {:>3}. {id}", pos + 1)?;
        }
    }

    if let Some(cycles) = &result.cycles {
        writeln!(w)?;
        pretty_section(w, &format!("Cycles ({})", cycles.len()))?;
        for cycle in cycles {
            writeln!(w, "  {}", cycle.join(" → "))?;
        }
    }

    if !result.node_degrees.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Degrees")?;
        for (id, degree) in &result.node_degrees {
            writeln!(w, "  {id:<20} in {:<4} out {}", degree.in_degree, degree.out_degree)?;
        }
    }

    Ok(())
}
