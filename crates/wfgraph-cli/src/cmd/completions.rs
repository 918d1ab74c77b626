//! `wfg completions`: print a completion script for the requested shell.

use std::io::{self, Write};

use clap::Args;
use clap_complete::{Shell, generate};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the script for `shell` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_completions(shell, command, &mut out);
    out.flush()?;
    Ok(())
}

/// The script registers completions under the command's own name, so it
/// stays correct if the binary is renamed in the manifest.
fn write_completions(shell: Shell, command: &mut clap::Command, w: &mut dyn Write) {
    let bin_name = command.get_name().to_string();
    generate(shell, command, bin_name, w);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Command, Parser};

    fn wfg() -> Command {
        Command::new("wfg")
            .subcommand(Command::new("analyze"))
            .subcommand(Command::new("parse"))
    }

    #[test]
    fn bash_script_lists_subcommands() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut wfg(), &mut out);
        let script = String::from_utf8(out).expect("utf8");

        assert!(script.contains("_wfg()"));
        assert!(script.contains("analyze"));
        assert!(script.contains("parse"));
    }

    #[test]
    fn zsh_script_registers_binary_name() {
        let mut out = Vec::new();
        write_completions(Shell::Zsh, &mut wfg(), &mut out);
        assert!(String::from_utf8(out).expect("utf8").contains("#compdef wfg"));
    }

    #[test]
    fn shell_argument_is_required() {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CompletionsArgs,
        }

        assert!(Wrapper::try_parse_from(["test"]).is_err());
        let parsed = Wrapper::parse_from(["test", "fish"]);
        assert_eq!(parsed.args.shell, Shell::Fish);
    }
}
