use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod gh;
mod server;
mod utils;

use cmd::{ExecArgs, ListArgs, ReadArgs};

/// gh-mcp - GitHub CLI exposed as an MCP server
///
/// Command layout:
///   gh-mcp [serve]                                  MCP over stdio (default)
///   gh-mcp list <tools|resources> [--json]
///   gh-mcp exec <TOOL> [--param k=v ...] [--param-file PATH] [--json] [--raw]
///   gh-mcp read <URI> [--json]
///
/// Global flags / env:
///   -v / -vv        Increase verbosity (logs go to stderr)
///   -q / --quiet    Errors only
///   --gh <COMMAND>  Program used for every gh call (or GH_MCP_GH env)
///   RUST_LOG        Overrides -v / -q when set
///
/// Examples:
///   gh-mcp
///   gh-mcp list tools
///   gh-mcp exec pr_view --param pr=42 --param repo=cli/cli
///   gh-mcp read repo://cli/cli --json
///   gh-mcp --gh "op plugin run -- gh" exec repo_list
#[derive(Parser, Debug)]
#[command(
    name = "gh-mcp",
    version,
    author,
    about = "gh-mcp - GitHub CLI operations as MCP tools and resources",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// gh command line to run (or GH_MCP_GH env); defaults to `gh`
    #[arg(long = "gh", global = true, value_name = "COMMAND")]
    gh: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve MCP over stdio (default)
    Serve,

    /// List tools or resource templates
    List(ListArgs),

    /// Execute (invoke) a tool
    Exec(ExecArgs),

    /// Read a resource by URI
    Read(ReadArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    // CLI flag > GH_MCP_GH env > "gh"
    let raw_program = cli.gh.clone().unwrap_or_else(|| {
        std::env::var("GH_MCP_GH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| gh::DEFAULT_PROGRAM.to_string())
    });

    let program = match gh::parse_program(&raw_program) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid gh command '{raw_program}': {e}");
            std::process::exit(2);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd::execute_serve(program),
        Commands::List(args) => cmd::execute_list(args, program),
        Commands::Exec(args) => cmd::execute_exec(args, program),
        Commands::Read(args) => cmd::execute_read(args, program),
    }
}
