#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wfgraph_core::ErrorBody;
use wfgraph_core::config::{Config, load_config};

use cmd::Settings;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "wfg: workflow graph validator and analyzer",
    long_about = None
)]
struct Cli {
    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (overrides $WFGRAPH_CONFIG and the user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum node records per payload.
    #[arg(long, global = true, value_name = "N")]
    max_nodes: Option<usize>,

    /// Maximum edge records per payload.
    #[arg(long, global = true, value_name = "N")]
    max_edges: Option<usize>,

    /// Reject malformed or dangling records instead of dropping them.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Merge config file values with flag overrides.
    fn settings(&self, config: &Config) -> Settings {
        let mut limits = config.limits;
        if let Some(max) = self.max_nodes {
            limits.max_nodes = max;
        }
        if let Some(max) = self.max_edges {
            limits.max_edges = max;
        }
        Settings {
            limits,
            strict: self.strict || config.analysis.strict,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyze a workflow graph",
        long_about = "Validate a node/edge payload and report cycles, execution order, degrees and connected components.",
        after_help = "EXAMPLES:\n    # Analyze a saved workflow\n    wfg analyze flow.json\n\n    # Read from stdin and emit JSON\n    cat flow.json | wfg analyze --format json\n\n    # Fail on dangling edges instead of dropping them\n    wfg analyze flow.json --strict"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Summarize a workflow graph",
        long_about = "Validate a node/edge payload and report only node count, edge count and whether it is a DAG.",
        after_help = "EXAMPLES:\n    # Quick validity check\n    wfg parse flow.json\n\n    # Emit machine-readable output\n    wfg parse flow.json --json"
    )]
    Parse(cmd::parse::ParseArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    wfg completions bash > /etc/bash_completion.d/wfg"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WFGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "wfg=debug,info"
        } else {
            "wfg=info,warn"
        })
    });

    let format = env::var("WFGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
        Commands::Analyze(args) => {
            let settings = cli.settings(&load_config(cli.config.as_deref())?);
            cmd::analyze::run_analyze(args, &settings, output)
        }
        Commands::Parse(args) => {
            let settings = cli.settings(&load_config(cli.config.as_deref())?);
            cmd::parse::run_parse(args, &settings, output)
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let output = output::resolve_output_mode(cli.format, cli.json);

    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let body = ErrorBody::from(&err);
            tracing::debug!(code = body.code, error = %format!("{err:#}"), "command failed");
            if output::render_error(output, &body).is_err() {
                eprintln!("error[{}]: {}", body.code, body.message);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfgraph_core::config::AnalysisConfig;
    use wfgraph_core::Limits;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["wfg", "analyze", "flow.json", "--strict", "--format", "json"]);
        assert!(cli.strict);
        assert_eq!(cli.format, Some(OutputMode::Json));
        assert!(matches!(cli.command, Commands::Analyze(_)));
    }

    #[test]
    fn hidden_json_flag_parses() {
        let cli = Cli::parse_from(["wfg", "--json", "parse"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Parse(_)));
    }

    #[test]
    fn flags_override_config_limits() {
        let cli = Cli::parse_from(["wfg", "analyze", "--max-nodes", "10"]);
        let config = Config {
            limits: Limits {
                max_nodes: 500,
                max_edges: 600,
            },
            analysis: AnalysisConfig { strict: true },
        };
        let settings = cli.settings(&config);
        assert_eq!(settings.limits.max_nodes, 10);
        assert_eq!(settings.limits.max_edges, 600);
        assert!(settings.strict);
    }

    #[test]
    fn defaults_without_config() {
        let cli = Cli::parse_from(["wfg", "parse"]);
        let settings = cli.settings(&Config::default());
        assert_eq!(settings.limits, Limits::default());
        assert!(!settings.strict);
    }

    #[test]
    fn completions_subcommand_parses_shell() {
        let cli = Cli::parse_from(["wfg", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Zsh,
            })
        ));
    }
}
