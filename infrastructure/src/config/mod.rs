//! Configuration file loading for anf-mcp
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ANF_MCP_*` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./anf-mcp.toml` or `./.anf-mcp.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/anf-mcp/config.toml`
//! 5. Default values
//!
//! Unset Azure identity fields then fall back to `AZURE_TENANT_ID`,
//! `AZURE_CLIENT_ID`, the client secret variable, `AZURE_SUBSCRIPTION_ID`
//! and `AZURE_RESOURCE_GROUP`.

mod file_config;
mod loader;

pub use file_config::{
    ClientCredentials, ConfigValidationError, FileAzureConfig, FileConfig, FileHttpConfig,
    FileServerConfig,
};
pub use loader::ConfigLoader;
