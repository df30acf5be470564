//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for inspecting and controlling MCP servers
/// across the assistant config, the editor settings, and the live
/// process table.
#[derive(Parser)]
#[command(name = "mcpscope")]
#[command(about = "Inspect and control MCP servers across their sources")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_verbose_flag() {
        let cli = Cli::parse_from(["mcpscope", "--verbose", "list"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn kill_takes_a_pid() {
        let cli = Cli::parse_from(["mcpscope", "kill", "900"]);
        assert!(matches!(cli.command, Some(Commands::Kill { pid: 900 })));
    }
}
