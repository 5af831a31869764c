//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "anf-mcp";
const PROJECT_FILES: [&str; 2] = ["anf-mcp.toml", ".anf-mcp.toml"];
const ENV_PREFIX: &str = "ANF_MCP_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `ANF_MCP_<SECTION>__<KEY>` (e.g. `ANF_MCP_AZURE__TENANT_ID`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./anf-mcp.toml` or `./.anf-mcp.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/anf-mcp/config.toml`
    /// 5. Default values
    ///
    /// Azure identity fields still unset afterwards fall back to the
    /// conventional `AZURE_*` variables.
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let config = Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract::<FileConfig>()
        .map_err(Box::new)?;

        Ok(Self::with_env_fallbacks(config))
    }

    /// Load only default configuration (for --no-config)
    ///
    /// Conventional `AZURE_*` variables still apply so a bare environment
    /// can authenticate.
    pub fn load_defaults() -> FileConfig {
        Self::with_env_fallbacks(FileConfig::default())
    }

    /// File layers only, lowest priority first
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment
    }

    fn with_env_fallbacks(mut config: FileConfig) -> FileConfig {
        config.azure = config
            .azure
            .with_env_fallbacks(|key| std::env::var(key).ok());
        config
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/anf-mcp/config.toml if set,
    /// otherwise falls back to ~/.config/anf-mcp/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    ///
    /// Written to stderr: stdout belongs to the tool protocol.
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        eprintln!("Configuration sources (in priority order):");
        eprintln!("  [ENV  ] {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            eprintln!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            eprintln!("  [FOUND] Project: {}", path.display());
        } else {
            eprintln!("  [     ] Project: ./anf-mcp.toml or ./.anf-mcp.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                eprintln!("  [FOUND] Global:  {}", path.display());
            } else {
                eprintln!("  [     ] Global:  {}", path.display());
            }
        }

        eprintln!("  [     ] Default: built-in defaults");
    }
}
