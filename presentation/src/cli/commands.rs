//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for anf-mcp
#[derive(Parser, Debug)]
#[command(name = "anf-mcp")]
#[command(author, version, about = "Azure NetApp Files management operations as schema-validated tools")]
#[command(long_about = r#"
anf-mcp exposes Azure NetApp Files management operations (accounts, capacity
pools, volumes, snapshots, backups, replication, ...) as tools over a stdio
JSON-RPC connection. Every call is validated against the operation's schema
before any credential or network activity.

Configuration files are loaded from (in priority order):
1. ANF_MCP_<SECTION>__<KEY>   Environment variables
2. --config <path>            Explicit config file
3. ./anf-mcp.toml             Project-level config
4. ~/.config/anf-mcp/config.toml   Global config

Example:
  anf-mcp                       Serve tools on stdin/stdout
  anf-mcp list --implemented-only
  anf-mcp schema anf_pools_create_or_update
  anf-mcp call anf_pools_list --args '{"accountName":"acct1"}'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The subcommand to run; `serve` when none is given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the tool protocol on stdin/stdout (default)
    Serve,

    /// List registered operations
    List {
        /// Print tool descriptors as JSON
        #[arg(long)]
        json: bool,

        /// Hide placeholder operations
        #[arg(long)]
        implemented_only: bool,
    },

    /// Dispatch a single operation and print its result
    Call {
        /// Operation name (e.g. anf_pools_list)
        name: String,

        /// Arguments as a JSON object
        #[arg(long, value_name = "JSON", default_value = "{}")]
        args: String,
    },

    /// Print the input schema of an operation
    Schema {
        /// Operation name
        name: String,
    },
}
