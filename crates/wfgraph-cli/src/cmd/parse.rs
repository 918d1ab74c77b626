//! `wfg parse`: validate a payload and print the headline summary only.

use std::io::Write;

use clap::Args;
use wfgraph_core::ParseSummary;

use super::{InputArgs, Settings, read_input, run_pipeline};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `wfg parse`.
#[derive(Args, Debug, Default)]
pub struct ParseArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute `wfg parse`.
pub fn run_parse(args: &ParseArgs, settings: &Settings, output: OutputMode) -> anyhow::Result<()> {
    let body = read_input(args.input.file.as_deref())?;
    let analyzed = run_pipeline(&body, settings)?;
    let summary = ParseSummary::from(&analyzed.result);

    render_mode(output, &summary, render_summary_text, render_summary_pretty)
}

fn render_summary_text(summary: &ParseSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "nodes={} edges={} dag={} cycles={}",
        summary.node_count, summary.edge_count, summary.is_dag, summary.has_cycles
    )
}

fn render_summary_pretty(summary: &ParseSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Pipeline")?;
    pretty_kv(w, "Nodes", summary.node_count.to_string())?;
    pretty_kv(w, "Edges", summary.edge_count.to_string())?;
    pretty_kv(
        w,
        "Status",
        if summary.is_dag {
            "valid DAG"
        } else {
            "contains cycles"
        },
    )
}
