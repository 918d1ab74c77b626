//! How `wfg` writes results and errors.
//!
//! Analysis results go to stdout and errors go to stderr, both in the same
//! [`OutputMode`]. JSON output is the `AnalysisResult` document itself, or
//! `{"error": {code, message, hint}}` on failure, so a calling service can
//! parse either stream without scraping text.
//!
//! The mode comes from `--format` (or the hidden `--json`), then the
//! `FORMAT` environment variable, and finally from whether stdout is a
//! terminal.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use wfgraph_core::ErrorBody;

/// Width of the rule under a pretty section heading.
pub const PRETTY_RULE_WIDTH: usize = 72;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Heading line plus rule, e.g. "Workflow graph" or "Cycles (2)".
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// `Key:` padded to a fixed column so values line up under each other.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sectioned report for a terminal.
    Pretty,
    /// One fact per line (`nodes=4 edges=3 ...`, `order 1 2 3`).
    Text,
    /// The serialized result or error body.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "text" => return OutputMode::Text,
            "pretty" => return OutputMode::Pretty,
            _ => {}
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Pick the mode for this invocation from flags, `FORMAT` and stdout.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), is_tty)
}

/// Write a command result to stdout: serialized for JSON, otherwise through
/// the command's own text or pretty renderer.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// Write an error in the requested format.
///
/// JSON mode wraps the body as `{"error": {...}}`; the other modes print
/// `error[CODE]: message` plus an optional hint line.
pub fn write_error(mode: OutputMode, error: &ErrorBody, w: &mut dyn Write) -> anyhow::Result<()> {
    if mode.is_json() {
        let wrapper = serde_json::json!({ "error": error });
        serde_json::to_writer_pretty(&mut *w, &wrapper)?;
        writeln!(w)?;
        return Ok(());
    }

    writeln!(w, "error[{}]: {}", error.code, error.message)?;
    if let Some(hint) = error.hint {
        writeln!(w, "  hint: {hint}")?;
    }
    Ok(())
}

pub fn render_error(mode: OutputMode, error: &ErrorBody) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(mode, error, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfgraph_core::ErrorCode;

    #[test]
    fn output_mode_is_json() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Pretty.is_json());
        assert!(!OutputMode::Text.is_json());
    }

    #[test]
    fn resolve_format_flag_wins_over_json_and_env() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Text), true, Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_format_env_case_insensitive() {
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("JSON"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("Text"), true),
            OutputMode::Text
        );
    }

    #[test]
    fn resolve_format_env_unknown_falls_through_to_tty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("yaml"), true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("yaml"), false),
            OutputMode::Text
        );
    }

    #[test]
    fn resolve_default_follows_tty() {
        assert_eq!(resolve_output_mode_inner(None, false, None, true), OutputMode::Pretty);
        assert_eq!(resolve_output_mode_inner(None, false, None, false), OutputMode::Text);
    }

    #[test]
    fn pretty_kv_aligns_keys() {
        let mut out = Vec::new();
        pretty_kv(&mut out, "Nodes", "4").expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "Nodes:       4\n");
    }

    #[test]
    fn write_error_json_wraps_body() {
        let body = ErrorBody::new(ErrorCode::PayloadTooLarge, "payload has 1001 nodes");
        let mut out = Vec::new();
        write_error(OutputMode::Json, &body, &mut out).expect("write");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["error"]["code"], "E1002");
        assert_eq!(value["error"]["message"], "payload has 1001 nodes");
    }

    #[test]
    fn write_error_pretty_matches_text() {
        let body = ErrorBody::new(ErrorCode::DanglingReference, "1 edge(s) reference unknown nodes");
        let (mut pretty, mut text) = (Vec::new(), Vec::new());
        write_error(OutputMode::Pretty, &body, &mut pretty).expect("write");
        write_error(OutputMode::Text, &body, &mut text).expect("write");

        assert_eq!(pretty, text);
        assert!(serde_json::from_slice::<serde_json::Value>(&text).is_err());
    }

    #[test]
    fn write_error_text_includes_code_and_hint() {
        let body = ErrorBody::new(ErrorCode::InvalidRequestShape, "expected an object");
        let mut out = Vec::new();
        write_error(OutputMode::Text, &body, &mut out).expect("write");

        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.starts_with("error[E1001]: expected an object"));
        assert!(rendered.contains("hint:"));
    }
}
