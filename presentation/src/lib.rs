//! Presentation layer for anf-mcp
//!
//! This crate contains the CLI definitions, the stdio tool server and the
//! console formatter used by the `list`, `schema` and `call` commands.

pub mod cli;
pub mod output;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use output::console::ConsoleFormatter;
pub use server::{ToolServer, serve};
